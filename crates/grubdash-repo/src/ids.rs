use grubdash_types::ports::id_generator::IdGenerator;
use uuid::Uuid;

/// 32 lowercase hex characters per id.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdGenerator;

impl IdGenerator for UuidIdGenerator {
    fn next_id(&self) -> String {
        Uuid::new_v4().simple().to_string()
    }
}
