use anyhow::{Result, anyhow};
use autoscale_cuckoo_filter::CuckooFilter;
use futures::StreamExt;
use once_cell::sync::Lazy;
use sqlx::MySqlPool;
use std::sync::RwLock;

/// Sized for the expected workforce; tune with real registration counts.
const FILTER_CAPACITY: usize = 100_000;
const FALSE_POSITIVE_RATE: f64 = 0.001;

static EMAIL_FILTER: Lazy<RwLock<CuckooFilter<String>>> =
    Lazy::new(|| RwLock::new(CuckooFilter::new(FILTER_CAPACITY, FALSE_POSITIVE_RATE)));

#[inline]
fn normalize(email: &str) -> String {
    email.to_lowercase()
}

/// A `false` here is definitive: the email was never registered.
pub fn might_exist(email: &str) -> bool {
    EMAIL_FILTER
        .read()
        .expect("email filter poisoned")
        .contains(&normalize(email))
}

/// Record a freshly registered email.
pub fn record(email: &str) {
    EMAIL_FILTER
        .write()
        .expect("email filter poisoned")
        .add(&normalize(email));
}

/// Stream every registered email into the filter in batches.
pub async fn warmup_email_filter(pool: &MySqlPool, batch_size: usize) -> Result<usize> {
    let mut stream = sqlx::query_as::<_, (String,)>("SELECT email FROM employee").fetch(pool);

    let mut batch = Vec::with_capacity(batch_size);
    let mut total = 0usize;

    while let Some(row) = stream.next().await {
        let (email,) = row.map_err(|e| anyhow!("DB row fetch failed: {}", e))?;

        batch.push(normalize(&email));
        total += 1;

        if batch.len() == batch_size {
            record_batch(&batch);
            batch.clear();
        }
    }

    if !batch.is_empty() {
        record_batch(&batch);
    }

    log::info!("Email filter warmup complete: {} employees", total);
    Ok(total)
}

fn record_batch(emails: &[String]) {
    let mut filter = EMAIL_FILTER.write().expect("email filter poisoned");

    for email in emails {
        filter.add(email);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unseen_email_is_definitively_absent() {
        assert!(!might_exist("nobody-here@filter-test.example"));
    }

    #[test]
    fn recorded_email_is_found_case_insensitively() {
        record("Worker@Filter-Test.example");
        assert!(might_exist("worker@filter-test.example"));
        assert!(might_exist("WORKER@FILTER-TEST.EXAMPLE"));
    }
}
