#[derive(Debug, Clone)]
pub struct TestCase {
    name: &'static str,
    payload: Vec<u8>,
}

impl TestCase {
    pub fn new(name: &'static str, payload: Vec<u8>) -> Self {
        Self { name, payload }
    }

    /// Repetitive html, compresses well.
    pub fn html(name: &'static str, group: TestGroup) -> Self {
        let mut payload = Vec::with_capacity(group.size());
        let mut i = 0;
        while payload.len() < group.size() {
            payload.extend_from_slice(format!("<tr><td>{i}</td><td>row number {i}</td></tr>\n").as_bytes());
            i += 1;
        }
        payload.truncate(group.size());
        Self::new(name, payload)
    }

    /// Pseudo random bytes, close to incompressible.
    pub fn noise(name: &'static str, group: TestGroup) -> Self {
        // xorshift, deterministic between runs
        let mut state: u64 = 0x9E37_79B9_7F4A_7C15;
        let payload = (0..group.size())
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 7;
                state ^= state << 17;
                state.to_le_bytes()[0]
            })
            .collect();
        Self::new(name, payload)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }
}

#[derive(Clone, Copy, Debug)]
pub enum TestGroup {
    Small,
    Normal,
    Large,
}

impl TestGroup {
    pub fn size(self) -> usize {
        match self {
            TestGroup::Small => 1024,
            TestGroup::Normal => 64 * 1024,
            TestGroup::Large => 1024 * 1024,
        }
    }
}
