//! Typed access to the keys the voting flow keeps in local storage.

use serde::{Deserialize, Serialize};

use super::errors::StorageError;
use super::persistence::KeyValueStore;
use crate::elections::{Candidate, Voter};

pub const TOKEN_KEY: &str = "token";
pub const CANDIDATE_DATA_KEY: &str = "candidateData";
pub const USER_DATA_KEY: &str = "userData";

/// Key of the per-election "voted" flag.
pub fn voted_key(election_id: &str) -> String {
    format!("voted_{}", election_id)
}

pub fn load_token<S: KeyValueStore + ?Sized>(store: &S) -> Result<Option<String>, StorageError> {
    Ok(store.get(TOKEN_KEY)?.filter(|t| !t.is_empty()))
}

pub fn save_token<S: KeyValueStore + ?Sized>(
    store: &mut S,
    token: &str,
) -> Result<(), StorageError> {
    store.set(TOKEN_KEY, token)
}

pub fn clear_token<S: KeyValueStore + ?Sized>(store: &mut S) -> Result<(), StorageError> {
    store.remove(TOKEN_KEY)
}

/// Whether the local cache claims a vote was cast. Any stored value counts.
pub fn is_marked_voted<S: KeyValueStore + ?Sized>(
    store: &S,
    election_id: &str,
) -> Result<bool, StorageError> {
    Ok(store.get(&voted_key(election_id))?.is_some())
}

pub fn mark_voted<S: KeyValueStore + ?Sized>(
    store: &mut S,
    election_id: &str,
) -> Result<(), StorageError> {
    store.set(&voted_key(election_id), "true")
}

pub fn clear_voted<S: KeyValueStore + ?Sized>(
    store: &mut S,
    election_id: &str,
) -> Result<(), StorageError> {
    store.remove(&voted_key(election_id))
}

/// Data written ahead of the OTP step so later steps know who votes for whom.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VoteHandoff {
    pub candidate: Candidate,
    pub voter: Voter,
}

pub fn write_handoff<S: KeyValueStore + ?Sized>(
    store: &mut S,
    candidate: &Candidate,
    voter: &Voter,
) -> Result<(), StorageError> {
    store.set(CANDIDATE_DATA_KEY, &encode(CANDIDATE_DATA_KEY, candidate)?)?;
    store.set(USER_DATA_KEY, &encode(USER_DATA_KEY, voter)?)?;
    Ok(())
}

/// Read back the hand-off, or `None` if either half is missing.
pub fn read_handoff<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<Option<VoteHandoff>, StorageError> {
    let (Some(candidate), Some(voter)) = (store.get(CANDIDATE_DATA_KEY)?, store.get(USER_DATA_KEY)?)
    else {
        return Ok(None);
    };

    Ok(Some(VoteHandoff {
        candidate: decode(CANDIDATE_DATA_KEY, &candidate)?,
        voter: decode(USER_DATA_KEY, &voter)?,
    }))
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<String, StorageError> {
    serde_json::to_string(value).map_err(|e| StorageError::EncodeFailed {
        key: key.to_string(),
        message: e.to_string(),
    })
}

fn decode<T: for<'de> Deserialize<'de>>(key: &str, raw: &str) -> Result<T, StorageError> {
    serde_json::from_str(raw).map_err(|e| StorageError::Corrupted {
        path: key.to_string(),
        message: e.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    fn candidate() -> Candidate {
        serde_json::from_value(serde_json::json!({
            "candidate_id": 8,
            "first_name": "Kofi",
            "last_name": "Mensah",
            "bio": "Class rep",
            "department": "EEE"
        }))
        .unwrap()
    }

    fn voter() -> Voter {
        serde_json::from_value(serde_json::json!({"userid": 7, "email": "a@uni.edu"})).unwrap()
    }

    #[test]
    fn test_voted_key_format() {
        assert_eq!(voted_key("12"), "voted_12");
    }

    #[test]
    fn test_empty_token_reads_as_missing() {
        let mut store = MemoryStore::new();
        save_token(&mut store, "").unwrap();
        assert_eq!(load_token(&store).unwrap(), None);

        save_token(&mut store, "jwt").unwrap();
        assert_eq!(load_token(&store).unwrap().as_deref(), Some("jwt"));

        clear_token(&mut store).unwrap();
        assert_eq!(load_token(&store).unwrap(), None);
    }

    #[test]
    fn test_voted_flag_roundtrip() {
        let mut store = MemoryStore::new();
        assert!(!is_marked_voted(&store, "12").unwrap());
        mark_voted(&mut store, "12").unwrap();
        assert!(is_marked_voted(&store, "12").unwrap());
        assert!(!is_marked_voted(&store, "13").unwrap());
        clear_voted(&mut store, "12").unwrap();
        assert!(!is_marked_voted(&store, "12").unwrap());
    }

    #[test]
    fn test_handoff_preserves_extra_fields() {
        let mut store = MemoryStore::new();
        write_handoff(&mut store, &candidate(), &voter()).unwrap();

        let handoff = read_handoff(&store).unwrap().unwrap();
        assert_eq!(handoff.candidate, candidate());
        assert_eq!(handoff.voter, voter());
        assert_eq!(handoff.candidate.extra["department"], "EEE");
    }

    #[test]
    fn test_handoff_missing_half_is_none() {
        let mut store = MemoryStore::new();
        store.set(CANDIDATE_DATA_KEY, "{}").unwrap();
        assert_eq!(read_handoff(&store).unwrap(), None);
    }
}
