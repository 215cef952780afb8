use order_desk_api::{
    config,
    db::{OrmConn, create_orm_conn, run_migrations},
    entity::{customers, products},
};
use sea_orm::{EntityTrait, Set, sea_query::OnConflict};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let database_url = config::database_url()?;

    let orm = create_orm_conn(&database_url, 1).await?;
    // Ensure migrations are applied.
    run_migrations(&orm).await?;

    seed_customers(&orm).await?;
    seed_products(&orm).await?;

    println!("Seed completed");
    Ok(())
}

async fn seed_customers(orm: &OrmConn) -> anyhow::Result<()> {
    let rows = vec![
        (1, "Mr", "Thabo", "Nkosi", "0821234567"),
        (2, "Ms", "Anna", "Botha", "0837654321"),
        (3, "Dr", "Sipho", "Dlamini", "0845550199"),
    ];

    for (id, title, name, surname, phone) in rows {
        customers::Entity::insert(customers::ActiveModel {
            customer_id: Set(id),
            customer_title: Set(Some(title.to_string())),
            customer_name: Set(name.to_string()),
            customer_surname: Set(surname.to_string()),
            cell_phone: Set(Some(phone.to_string())),
        })
        .on_conflict(
            OnConflict::column(customers::Column::CustomerId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(orm)
        .await?;
    }

    println!("Seeded customers");
    Ok(())
}

async fn seed_products(orm: &OrmConn) -> anyhow::Result<()> {
    let rows = vec![
        (1, "Desk Lamp", "LED lamp with dimmer", Some(40)),
        (2, "Notebook A5", "Ruled, 96 pages", Some(250)),
        (3, "Fountain Pen", "Steel nib, blue ink", Some(15)),
        (4, "Gift Card", "Redeemable online", None),
    ];

    for (id, name, desc, stock) in rows {
        products::Entity::insert(products::ActiveModel {
            product_id: Set(id),
            product_name: Set(name.to_string()),
            product_description: Set(Some(desc.to_string())),
            units_in_stock: Set(stock),
        })
        .on_conflict(
            OnConflict::column(products::Column::ProductId)
                .do_nothing()
                .to_owned(),
        )
        .exec_without_returning(orm)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
