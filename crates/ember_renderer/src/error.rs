use ember_core::MeshError;
use thiserror::Error;

/// Errors raised while assembling a scene for rendering.
#[derive(Error, Debug)]
pub enum SceneError {
    #[error("Object {index} has no bounding box and cannot be placed in a BVH")]
    MissingBoundingBox { index: usize },

    #[error("Invalid mesh: {0}")]
    Mesh(#[from] MeshError),

    #[error("Unknown scene '{0}'")]
    UnknownScene(String),

    #[error("Scene '{scene}' needs {what}")]
    MissingInput { scene: String, what: String },
}

pub type SceneResult<T> = Result<T, SceneError>;
