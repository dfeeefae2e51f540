use arbitrary::{Arbitrary, Result, Unstructured};
use flatcoll::GrowthStrategy;

/// Construction parameters shared by all fuzz targets.
#[derive(Debug, Clone, Copy)]
pub struct Config {
    pub initial_capacity: usize,
    pub strategy: GrowthStrategy,
}

impl Arbitrary<'_> for Config {
    fn arbitrary(u: &mut Unstructured) -> Result<Self> {
        // Ensure the logger is initialized.
        let _ = pretty_env_logger::try_init();

        Ok(Config {
            initial_capacity: u.int_in_range(1..=64)?,
            strategy: u.arbitrary()?,
        })
    }
}

/// Common shape of a test case: construction parameters followed by a
/// sequence of operations to apply.
#[derive(Debug, Arbitrary)]
pub struct TestCase<Op> {
    pub config: Config,
    pub ops: Vec<Op>,
}
