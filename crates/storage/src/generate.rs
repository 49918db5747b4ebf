use rand::Rng;
use shared::domain::AttendeeId;
use uuid::Uuid;

const HEX_DIGITS: &[u8] = b"0123456789abcdef";
const BASE58_DIGITS: &[u8] = b"123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Length of a CIDv0 content hash.
pub const IPFS_HASH_LEN: usize = 46;
const MIN_IPFS_HASH_BODY: usize = 8;
const WALLET_HEX_LEN: usize = 40;
const TX_HEX_LEN: usize = 64;

/// Mock wallet address: `0x` plus 40 lowercase hex digits, no checksum.
pub fn generate_wallet_address() -> String {
    random_string("0x", HEX_DIGITS, WALLET_HEX_LEN)
}

pub fn generate_tx_id() -> String {
    random_string("0x", HEX_DIGITS, TX_HEX_LEN)
}

/// Mock content hash: `prefix` followed by base58 characters.
pub fn generate_ipfs_hash(prefix: &str) -> String {
    let body = IPFS_HASH_LEN
        .saturating_sub(prefix.len())
        .max(MIN_IPFS_HASH_BODY);
    random_string(prefix, BASE58_DIGITS, body)
}

pub fn generate_attendee_id() -> AttendeeId {
    AttendeeId(format!("att-{}", Uuid::new_v4().simple()))
}

pub fn is_wallet_address(candidate: &str) -> bool {
    let Some(digits) = candidate.strip_prefix("0x") else {
        return false;
    };
    digits.len() == WALLET_HEX_LEN && digits.bytes().all(|b| HEX_DIGITS.contains(&b))
}

fn random_string(prefix: &str, alphabet: &[u8], len: usize) -> String {
    let mut rng = rand::thread_rng();
    let mut out = String::with_capacity(prefix.len() + len);
    out.push_str(prefix);
    out.extend((0..len).map(|_| alphabet[rng.gen_range(0..alphabet.len())] as char));
    out
}
