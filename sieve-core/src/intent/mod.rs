pub mod taxonomy;
pub mod weights;

pub use taxonomy::Intent;
pub use weights::{default_weights, ChannelWeights, IntentProfile, ProfileSource, WeightProfiles};
