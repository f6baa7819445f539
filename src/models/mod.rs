pub mod donation;
pub mod ngo;
pub mod utilization;

pub use donation::*;
pub use ngo::*;
pub use utilization::*;

use serde::de::DeserializeOwned;
use serde_json::Value;

/// Decode list entries one by one; an entry that does not fit `T` is logged
/// and skipped so the rest of the list survives.
pub fn decode_entries<T: DeserializeOwned>(entries: Option<Vec<Value>>, kind: &str) -> Vec<T> {
    entries
        .unwrap_or_default()
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match serde_json::from_value(entry) {
            Ok(item) => Some(item),
            Err(e) => {
                tracing::warn!(kind, index, "Skipping malformed entry: {}", e);
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_decode_entries_skips_bad_entry() {
        let entries = vec![
            json!({"ngo_id": 1, "name": "Hope Foundation"}),
            json!({"ngo_id": 2, "name": "Other", "beneficiaries": 1200.5}),
            json!({"ngo_id": 3, "name": "River Trust"}),
        ];
        let ngos: Vec<NgoProfile> = decode_entries(Some(entries), "ngo");
        let ids: Vec<i64> = ngos.iter().map(|n| n.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_decode_entries_missing_list() {
        let ngos: Vec<NgoProfile> = decode_entries(None, "ngo");
        assert!(ngos.is_empty());
    }
}
