use crc32fast::Hasher;

/// Generate a session seed from a session name using CRC32
pub fn get_session_seed(name: &str) -> String {
    let mut buff = String::from(name);
    if !name.starts_with("session://") {
        buff = format!("session://{}", buff);
    }

    let mut hasher = Hasher::new();
    hasher.update(buff.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Sequential ID generator for widgets within an editing session
///
/// The counter only moves forward, so an id handed out once is never handed
/// out again by the same generator.
#[derive(Debug, Clone)]
pub struct IdGenerator {
    seed: String,
    count: u64,
}

impl IdGenerator {
    pub fn new(session_name: &str) -> Self {
        Self {
            seed: get_session_seed(session_name),
            count: 0,
        }
    }

    pub fn from_seed(seed: String) -> Self {
        Self { seed, count: 0 }
    }

    /// Generate next sequential ID
    pub fn new_id(&mut self) -> String {
        self.count += 1;
        format!("{}-{}", self.seed, self.count)
    }

    /// Advance past an id minted elsewhere (e.g. restored from disk)
    pub fn observe(&mut self, id: &str) {
        let Some(suffix) = id
            .strip_prefix(self.seed.as_str())
            .and_then(|rest| rest.strip_prefix('-'))
        else {
            return;
        };

        if let Ok(n) = suffix.parse::<u64>() {
            self.count = self.count.max(n);
        }
    }

    pub fn seed(&self) -> &str {
        &self.seed
    }

    pub fn count(&self) -> u64 {
        self.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_seed_generation() {
        let id1 = get_session_seed("main");
        let id2 = get_session_seed("main");

        // Same name always generates same seed
        assert_eq!(id1, id2);

        // Different names generate different seeds
        let id3 = get_session_seed("other");
        assert_ne!(id1, id3);
    }

    #[test]
    fn test_sequential_ids() {
        let mut gen = IdGenerator::new("test");

        let id1 = gen.new_id();
        let id2 = gen.new_id();
        let id3 = gen.new_id();

        assert!(id1.ends_with("-1"));
        assert!(id2.ends_with("-2"));
        assert!(id3.ends_with("-3"));

        let seed = gen.seed();
        assert!(id1.starts_with(seed));
        assert!(id3.starts_with(seed));
    }

    #[test]
    fn test_observe_skips_past_restored_ids() {
        let mut gen = IdGenerator::new("test");
        let restored = format!("{}-41", gen.seed());

        gen.observe(&restored);
        gen.observe("foreign-900");
        gen.observe(&format!("{}-3", gen.seed()));

        assert_eq!(gen.new_id(), format!("{}-42", gen.seed()));
    }
}
