//! Demo data for local visual testing (`ORDERDASH_SEED_DEMO=true`).

use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use uuid::Uuid;

use orderdash_core::record::{OrderRecord, ProductRecord, UserRecord};
use orderdash_core::role::Role;

const DEMO_CATEGORIES: &[&str] = &["Automotive", "Electronics", "Home", "Accessories"];
const DEMO_STATUSES: &[&str] = &["pending", "paid", "cancelled"];

pub struct DemoData {
    pub orders: Vec<OrderRecord>,
    pub products: Vec<ProductRecord>,
    pub users: Vec<UserRecord>,
}

/// 6 products, 10 users (the first one an admin) and 18 orders spread over
/// the 7 days ending at `now`.
pub fn demo_data<R: Rng>(now: DateTime<Utc>, rng: &mut R) -> DemoData {
    let products = (1..=6i64)
        .map(|i| ProductRecord {
            id: Uuid::new_v4().to_string(),
            name: format!("Product {i}"),
            price: 19.99 + i as f64,
            stock: 20 + i * 3,
            category: DEMO_CATEGORIES[(i as usize) % DEMO_CATEGORIES.len()].to_string(),
            active: true,
            created_at: Some(now - Duration::days(i)),
        })
        .collect();

    let users = (0..10)
        .map(|i| {
            let is_admin = i == 0;
            UserRecord {
                id: Uuid::new_v4().to_string(),
                email: if is_admin {
                    "admin@example.com".to_string()
                } else {
                    format!("user{i}@example.com")
                },
                role: if is_admin { Role::Admin } else { Role::User },
                disabled: false,
                created_at: Some(now),
            }
        })
        .collect();

    let orders = (0..18)
        .map(|i| {
            let age = Duration::days(rng.gen_range(0..7)) + Duration::hours(rng.gen_range(0..12));
            let total = ((20.0 + rng.gen::<f64>() * 180.0) * 100.0).round() / 100.0;
            let status = DEMO_STATUSES[rng.gen_range(0..DEMO_STATUSES.len())];
            OrderRecord {
                id: Uuid::new_v4().to_string(),
                number: Some(format!("#{}", 1001 + i)),
                customer: None,
                status: Some(status.to_string()),
                total: Some(total),
                amount: None,
                created_at: Some(now - age),
            }
        })
        .collect();

    DemoData {
        orders,
        products,
        users,
    }
}
