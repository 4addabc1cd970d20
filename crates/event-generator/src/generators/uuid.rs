//! UUID v4 generator driven by [`SeededRandom`].

use crate::rng::SeededRandom;
use uuid::Uuid;

/// Generate a v4-shaped UUID string from the seeded random source.
///
/// Every hex digit is drawn as `floor(next * 16)`. The version nibble is
/// fixed to `4` and the variant nibble is forced into `8..=b`, so one UUID
/// consumes 31 draws.
pub fn generate_uuid_v4(rng: &mut SeededRandom) -> String {
    let mut nibbles = [0u8; 32];
    for (pos, nibble) in nibbles.iter_mut().enumerate() {
        *nibble = match pos {
            12 => 0x4,
            16 => ((rng.next_f64() * 16.0) as u8 & 0x3) | 0x8,
            _ => (rng.next_f64() * 16.0) as u8,
        };
    }

    let mut bytes = [0u8; 16];
    for (i, byte) in bytes.iter_mut().enumerate() {
        *byte = (nibbles[i * 2] << 4) | nibbles[i * 2 + 1];
    }

    Uuid::from_bytes(bytes).hyphenated().to_string()
}

/// Whether `value` has the canonical v4 shape produced by [`generate_uuid_v4`].
#[cfg(test)]
pub(crate) fn is_uuid_v4(value: &str) -> bool {
    if value.len() != 36 {
        return false;
    }

    let bytes = value.as_bytes();
    for (i, b) in bytes.iter().enumerate() {
        let ok = match i {
            8 | 13 | 18 | 23 => *b == b'-',
            14 => *b == b'4',
            19 => matches!(b, b'8' | b'9' | b'a' | b'b'),
            _ => b.is_ascii_digit() || (b'a'..=b'f').contains(b),
        };
        if !ok {
            return false;
        }
    }

    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_uuid_v4_shape() {
        let mut rng = SeededRandom::new(42);

        for _ in 0..1000 {
            let id = generate_uuid_v4(&mut rng);
            assert!(is_uuid_v4(&id), "bad uuid: {id}");
        }
    }

    #[test]
    fn test_uuid_version_via_uuid_crate() {
        let mut rng = SeededRandom::new(42);
        let id = generate_uuid_v4(&mut rng);
        let parsed = Uuid::parse_str(&id).unwrap();

        assert_eq!(parsed.get_version_num(), 4);
        assert_eq!(parsed.get_variant(), uuid::Variant::RFC4122);
    }

    #[test]
    fn test_uuid_deterministic() {
        let mut rng1 = SeededRandom::new(42);
        let mut rng2 = SeededRandom::new(42);

        assert_eq!(generate_uuid_v4(&mut rng1), generate_uuid_v4(&mut rng2));
    }

    #[test]
    fn test_uuid_consumes_31_draws() {
        let mut rng = SeededRandom::new(11);
        let mut shadow = SeededRandom::new(11);

        generate_uuid_v4(&mut rng);
        for _ in 0..31 {
            shadow.next_f64();
        }

        assert_eq!(rng, shadow);
    }

    #[test]
    fn test_is_uuid_v4_rejects() {
        assert!(!is_uuid_v4("not-a-uuid"));
        // version nibble 1
        assert!(!is_uuid_v4("123e4567-e89b-12d3-a456-426614174000"));
        // variant nibble c
        assert!(!is_uuid_v4("123e4567-e89b-42d3-c456-426614174000"));
        // uppercase
        assert!(!is_uuid_v4("123E4567-E89B-42D3-A456-426614174000"));
        assert!(is_uuid_v4("123e4567-e89b-42d3-a456-426614174000"));
    }
}
