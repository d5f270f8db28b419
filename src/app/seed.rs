//! Sample data for local development.

use rand::Rng;
use tracing::info;

use crate::domain::{AppError, CustomerId, CustomerRepository, NewCustomer};

/// Number of customers inserted when no count is given.
pub const DEFAULT_SEED_COUNT: usize = 10;

const FIRST_NAMES: &[&str] = &[
    "Alice", "Bruno", "Chloe", "Daniel", "Elena", "Farid", "Grace", "Hiro", "Ines", "Jonas",
    "Keiko", "Liam", "Maya", "Noah", "Olga", "Pedro",
];

const LAST_NAMES: &[&str] = &[
    "Anderson", "Baker", "Costa", "Dubois", "Evans", "Fischer", "Garcia", "Hughes", "Ivanova",
    "Jensen", "Kowalski", "Lopez", "Moreau", "Nakamura",
];

/// Build `count` customers with random names and ages in `1..=100`.
pub fn random_customers<R: Rng>(rng: &mut R, count: usize) -> Vec<NewCustomer> {
    (0..count)
        .map(|_| {
            let first = FIRST_NAMES[rng.gen_range(0..FIRST_NAMES.len())];
            let last = LAST_NAMES[rng.gen_range(0..LAST_NAMES.len())];
            NewCustomer::new(format!("{first} {last}"), rng.gen_range(1..=100))
        })
        .collect()
}

/// Insert `count` random customers, stopping at the first failure.
pub async fn seed_customers(
    repository: &dyn CustomerRepository,
    count: usize,
) -> Result<Vec<CustomerId>, AppError> {
    let customers = random_customers(&mut rand::thread_rng(), count);

    let mut ids = Vec::with_capacity(customers.len());
    for customer in &customers {
        ids.push(repository.create(customer).await?);
    }

    info!(count = ids.len(), "Seeded customers");
    Ok(ids)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::MockCustomerRepository;
    use rand::SeedableRng;
    use rand::rngs::StdRng;

    #[test]
    fn test_random_customers_are_valid() {
        let mut rng = StdRng::seed_from_u64(7);
        let customers = random_customers(&mut rng, 50);

        assert_eq!(customers.len(), 50);
        for customer in customers {
            assert!((1..=100).contains(&customer.age));
            assert!(customer.name.contains(' '));
        }
    }

    #[tokio::test]
    async fn test_seed_customers_inserts_rows() {
        let repository = MockCustomerRepository::new();

        let ids = seed_customers(&repository, DEFAULT_SEED_COUNT).await.unwrap();

        assert_eq!(ids, (1..=10).collect::<Vec<_>>());
        assert_eq!(repository.customers().len(), 10);
    }

    #[tokio::test]
    async fn test_seed_customers_stops_on_failure() {
        let repository = MockCustomerRepository::failing("read-only database");

        let result = seed_customers(&repository, 3).await;

        assert!(result.is_err());
        assert_eq!(repository.call_count(), 1);
    }
}
