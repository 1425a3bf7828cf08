pub mod codec;
pub mod css;
pub mod id;
pub mod model;
pub mod scene;
pub mod symmetry;
pub mod transform;

pub use codec::{CharacterRecord, LayoutDocument};
pub use id::{InstanceId, PairId};
pub use model::*;
pub use scene::{Affected, Scene, Snapshot};
pub use transform::{Transform, TransformInput, compute_transform};
