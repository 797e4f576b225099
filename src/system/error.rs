use crate::celestial::CelestialError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DescriptionError {
    #[error("category `{0}` is missing in the system description")]
    MissingCategory(&'static str),

    #[error("category `{0}` is invalid")]
    InvalidCategory(String),

    #[error("a system description must be a JSON object")]
    NotAnObject,

    #[error("malformed subsystem entry: {0}")]
    MalformedSubsystem(String),

    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("`{name}` in subsystem `{subsystem}` is neither an object nor a subsystem")]
    UnresolvedReference { name: String, subsystem: String },

    #[error("root subsystem `{0}` does not exist")]
    UnknownRoot(String),

    #[error("subsystem `{0}` contains itself")]
    CyclicHierarchy(String),

    #[error("the hierarchy is empty")]
    EmptyHierarchy,

    #[error("subsystem `{0}` has satellites or rings but no planet")]
    MissingParentPlanet(String),

    #[error("the system has no star")]
    NoStar,

    #[error("`{object}` has no `{field}`")]
    MissingField { object: String, field: &'static str },

    #[error(transparent)]
    Celestial(#[from] CelestialError),
}

pub type DescriptionResult<T> = Result<T, DescriptionError>;
