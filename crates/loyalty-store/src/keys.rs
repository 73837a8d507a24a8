//! Key encoding utilities.
//!
//! Both backends address rows by the same byte keys, so a table scan is a
//! prefix scan in either of them.
//!
//! Row key format:
//!
//! `len(table) (u16 BE) || table || column*`
//!
//! where each key column is `tag (u8) || payload`:
//!
//! - string: `0x01 || len (u32 BE) || utf8 bytes`
//! - int64:  `0x02 || value (i64 BE, sign bit flipped)`
//! - bool:   `0x03 || 0x00 | 0x01`
//!
//! Every component is self-delimiting, so the key of a leading subset of key
//! columns is a byte prefix of every full key that starts with them.

use crate::table::Column;

const TAG_STRING: u8 = 0x01;
const TAG_INT64: u8 = 0x02;
const TAG_BOOL: u8 = 0x03;

/// Create a state key from a caller key.
#[must_use]
pub fn state_key(key: &str) -> Vec<u8> {
    key.as_bytes().to_vec()
}

/// Create a schema key from a table name.
#[must_use]
pub fn table_key(table: &str) -> Vec<u8> {
    table.as_bytes().to_vec()
}

/// Create a row key from a table name and key columns.
///
/// With fewer columns than the table's key this is a scan prefix; with none
/// it is the prefix of every row in the table.
///
/// # Panics
///
/// Panics if the table name is longer than `u16::MAX` bytes or a string
/// column is longer than `u32::MAX` bytes.
#[must_use]
pub fn row_key(table: &str, key_columns: &[Column]) -> Vec<u8> {
    let mut key = Vec::with_capacity(2 + table.len() + key_columns.len() * 16);
    let table_len = u16::try_from(table.len()).expect("table name fits in u16");
    key.extend_from_slice(&table_len.to_be_bytes());
    key.extend_from_slice(table.as_bytes());

    for column in key_columns {
        match column {
            Column::String(s) => {
                let len = u32::try_from(s.len()).expect("key column fits in u32");
                key.push(TAG_STRING);
                key.extend_from_slice(&len.to_be_bytes());
                key.extend_from_slice(s.as_bytes());
            }
            Column::Int64(v) => {
                key.push(TAG_INT64);
                #[allow(clippy::cast_sign_loss)]
                let ordered = (*v as u64) ^ (1 << 63);
                key.extend_from_slice(&ordered.to_be_bytes());
            }
            Column::Bool(b) => {
                key.push(TAG_BOOL);
                key.push(u8::from(*b));
            }
        }
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn state_key_is_raw_bytes() {
        assert_eq!(state_key("userId"), b"userId".to_vec());
    }

    #[test]
    fn row_key_format() {
        let key = row_key("T", &["ab".into()]);
        assert_eq!(key, vec![0, 1, b'T', TAG_STRING, 0, 0, 0, 2, b'a', b'b']);
    }

    #[test]
    fn table_prefix_does_not_leak_into_longer_names() {
        let user_row = row_key("User", &["x".into()]);
        let user_table_row = row_key("UserTable", &["x".into()]);

        let user_prefix = row_key("User", &[]);

        assert!(user_row.starts_with(&user_prefix));
        assert!(!user_table_row.starts_with(&user_prefix));
    }

    #[test]
    fn key_prefix_is_byte_prefix() {
        let full = row_key("T", &["a".into(), Column::Int64(-5), Column::Bool(true)]);
        let partial = row_key("T", &["a".into()]);
        assert!(full.starts_with(&partial));

        let other = row_key("T", &["ab".into(), Column::Int64(-5), Column::Bool(true)]);
        assert!(!other.starts_with(&partial));
    }

    #[test]
    fn int64_keys_sort_numerically() {
        let neg = row_key("T", &[Column::Int64(-1)]);
        let zero = row_key("T", &[Column::Int64(0)]);
        let pos = row_key("T", &[Column::Int64(7)]);
        assert!(neg < zero);
        assert!(zero < pos);
    }
}
