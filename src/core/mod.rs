mod store;

pub use store::{CachingPasscodeStore, PasscodeStoreBuilder};
