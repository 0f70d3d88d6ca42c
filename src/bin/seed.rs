use argon2::{
    Argon2, PasswordHasher,
    password_hash::{SaltString, rand_core::OsRng},
};
use salon_backoffice::{
    config::AppConfig,
    db::{DbPool, create_orm_conn, create_pool, run_migrations},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;

    let pool = create_pool(&config.database_url).await?;

    let owner_id = ensure_owner(&pool, "owner@example.com", "Camille Owner", "owner1234").await?;
    let salon_id = ensure_salon(&pool, owner_id, "Salon Centre", "1 place du Marché").await?;
    let manager_id = ensure_staff(
        &pool,
        owner_id,
        "manager@example.com",
        "Julie Manager",
        "MANAGER",
        "manager1234",
    )
    .await?;
    let staff_id = ensure_staff(
        &pool,
        owner_id,
        "staff@example.com",
        "Alex Staff",
        "STAFF",
        "staff1234",
    )
    .await?;
    ensure_membership(&pool, manager_id, salon_id).await?;
    ensure_membership(&pool, staff_id, salon_id).await?;
    seed_catalog(&pool, salon_id).await?;

    println!("Seed completed. Owner ID: {owner_id}, Salon ID: {salon_id}");
    Ok(())
}

fn hash(password: &str) -> anyhow::Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();
    Ok(hash)
}

async fn ensure_owner(pool: &DbPool, email: &str, name: &str, password: &str) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM profiles WHERE email = $1")
        .bind(email)
        .fetch_optional(pool)
        .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO profiles (id, email, name, password_hash)
        VALUES ($1, $2, $3, $4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .bind(hash(password)?)
    .fetch_one(pool)
    .await?;

    println!("Ensured owner {email}");
    Ok(id)
}

async fn ensure_salon(pool: &DbPool, owner_id: Uuid, name: &str, address: &str) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM salons WHERE owner_id = $1 AND name = $2")
            .bind(owner_id)
            .bind(name)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO salons (id, owner_id, name, address, total_workstations, booking_workstations)
        VALUES ($1, $2, $3, $4, 6, 4)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(name)
    .bind(address)
    .fetch_one(pool)
    .await?;

    println!("Ensured salon {name}");
    Ok(id)
}

async fn ensure_staff(
    pool: &DbPool,
    owner_id: Uuid,
    email: &str,
    name: &str,
    role: &str,
    password: &str,
) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO staff (id, owner_id, email, name, role, status, is_bookable, password_hash)
        VALUES ($1, $2, $3, $4, $5, 'ACTIVE', TRUE, $6)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(owner_id)
    .bind(email)
    .bind(name)
    .bind(role)
    .bind(hash(password)?)
    .fetch_one(pool)
    .await?;

    println!("Ensured collaborator {email} (role={role})");
    Ok(id)
}

async fn ensure_membership(pool: &DbPool, staff_id: Uuid, salon_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO salon_members (id, staff_id, salon_id)
        VALUES ($1, $2, $3)
        ON CONFLICT (staff_id, salon_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(staff_id)
    .bind(salon_id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn seed_catalog(pool: &DbPool, salon_id: Uuid) -> anyhow::Result<()> {
    let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM services WHERE salon_id = $1")
        .bind(salon_id)
        .fetch_one(pool)
        .await?;
    if count > 0 {
        println!("Catalog already seeded");
        return Ok(());
    }

    let services = vec![
        ("Coupe femme", 4500_i64, 45),
        ("Coupe homme", 2500, 30),
        ("Couleur", 6500, 90),
    ];
    for (name, price, duration) in services {
        sqlx::query(
            r#"
            INSERT INTO services (id, salon_id, name, price, duration, is_active)
            VALUES ($1, $2, $3, $4, $5, TRUE)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(salon_id)
        .bind(name)
        .bind(price)
        .bind(duration)
        .execute(pool)
        .await?;
    }

    let products = vec![
        ("Shampoing réparateur", 1800_i64, 12, 3),
        ("Masque hydratant", 2400, 2, 3),
        ("Spray coiffant", 1500, 8, 2),
    ];
    for (name, price, stock, threshold) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, salon_id, name, price, stock_qty, alert_threshold)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(salon_id)
        .bind(name)
        .bind(price)
        .bind(stock)
        .bind(threshold)
        .execute(pool)
        .await?;
    }

    println!("Seeded catalog");
    Ok(())
}
