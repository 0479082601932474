//! Games listed in the catalogue and the ownership view used by trading.

use super::text::{TextFieldError, bounded};
use super::{GameId, UserId};

/// Maximum title length in characters.
pub const TITLE_MAX: usize = 256;
/// Maximum publisher length in characters.
pub const PUBLISHER_MAX: usize = 256;
/// Maximum description length in characters.
pub const DESCRIPTION_MAX: usize = 4096;
/// Maximum condition length in characters.
pub const CONDITION_MAX: usize = 64;

/// Validation errors for game records.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GameValidationError {
    /// A text field failed its bounds.
    #[error(transparent)]
    Field(#[from] TextFieldError),
    /// The release year was not positive.
    #[error("year must be a positive integer, got {year}")]
    InvalidYear {
        /// Rejected year.
        year: i32,
    },
    /// A partial update supplied no fields.
    #[error("at least one of title, description or condition must be supplied")]
    EmptyPatch,
}

impl GameValidationError {
    /// Wire name of the offending field, when one field is at fault.
    #[must_use]
    pub fn field(&self) -> Option<&'static str> {
        match self {
            Self::Field(err) => Some(err.field()),
            Self::InvalidYear { .. } => Some("year"),
            Self::EmptyPatch => None,
        }
    }
}

/// Descriptive attributes of a game. Ownership is tracked separately.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetails {
    title: String,
    publisher: String,
    description: String,
    year: i32,
    condition: String,
}

/// Unvalidated input for [`GameDetails::new`].
#[derive(Debug, Clone, Default)]
pub struct GameDetailsDraft {
    /// Game title.
    pub title: String,
    /// Publishing house.
    pub publisher: String,
    /// Free-form description.
    pub description: String,
    /// Release year.
    pub year: i32,
    /// Physical condition, for example `"mint"`.
    pub condition: String,
}

impl GameDetails {
    /// Validate a draft.
    pub fn new(draft: GameDetailsDraft) -> Result<Self, GameValidationError> {
        let GameDetailsDraft {
            title,
            publisher,
            description,
            year,
            condition,
        } = draft;
        if year <= 0 {
            return Err(GameValidationError::InvalidYear { year });
        }
        Ok(Self {
            title: bounded("title", title, TITLE_MAX)?,
            publisher: bounded("publisher", publisher, PUBLISHER_MAX)?,
            description: bounded("description", description, DESCRIPTION_MAX)?,
            year,
            condition: bounded("condition", condition, CONDITION_MAX)?,
        })
    }

    /// Game title.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Publishing house.
    #[must_use]
    pub fn publisher(&self) -> &str {
        &self.publisher
    }

    /// Free-form description.
    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    /// Release year.
    #[must_use]
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Physical condition.
    #[must_use]
    pub fn condition(&self) -> &str {
        &self.condition
    }

    /// Apply a partial update.
    #[must_use]
    pub fn with_patch(mut self, patch: &GameDetailsPatch) -> Self {
        if let Some(title) = patch.title() {
            title.clone_into(&mut self.title);
        }
        if let Some(description) = patch.description() {
            description.clone_into(&mut self.description);
        }
        if let Some(condition) = patch.condition() {
            condition.clone_into(&mut self.condition);
        }
        self
    }
}

/// Partial update of a game's mutable details; at least one field is present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameDetailsPatch {
    title: Option<String>,
    description: Option<String>,
    condition: Option<String>,
}

impl GameDetailsPatch {
    /// Validate the supplied fields, rejecting a patch that changes nothing.
    pub fn new(
        title: Option<String>,
        description: Option<String>,
        condition: Option<String>,
    ) -> Result<Self, GameValidationError> {
        if title.is_none() && description.is_none() && condition.is_none() {
            return Err(GameValidationError::EmptyPatch);
        }
        Ok(Self {
            title: title.map(|v| bounded("title", v, TITLE_MAX)).transpose()?,
            description: description
                .map(|v| bounded("description", v, DESCRIPTION_MAX))
                .transpose()?,
            condition: condition
                .map(|v| bounded("condition", v, CONDITION_MAX))
                .transpose()?,
        })
    }

    /// Replacement title, if any.
    #[must_use]
    pub fn title(&self) -> Option<&str> {
        self.title.as_deref()
    }

    /// Replacement description, if any.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    /// Replacement condition, if any.
    #[must_use]
    pub fn condition(&self) -> Option<&str> {
        self.condition.as_deref()
    }
}

/// Who currently owns a game. This is the only view trading needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GameOwnership {
    /// Game being described.
    pub game_id: GameId,
    /// Current owner.
    pub owner: UserId,
}

/// Game record with its current owner.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Game {
    id: GameId,
    owner: UserId,
    details: GameDetails,
}

impl Game {
    /// Assemble a game from validated parts.
    #[must_use]
    pub fn new(id: GameId, owner: UserId, details: GameDetails) -> Self {
        Self { id, owner, details }
    }

    /// Stable identifier.
    #[must_use]
    pub fn id(&self) -> GameId {
        self.id
    }

    /// Current owner.
    #[must_use]
    pub fn owner(&self) -> UserId {
        self.owner
    }

    /// Descriptive attributes.
    #[must_use]
    pub fn details(&self) -> &GameDetails {
        &self.details
    }

    /// Ownership view consumed by the offer validator.
    #[must_use]
    pub fn ownership(&self) -> GameOwnership {
        GameOwnership {
            game_id: self.id,
            owner: self.owner,
        }
    }

    /// Replace the descriptive attributes.
    #[must_use]
    pub fn with_details(mut self, details: GameDetails) -> Self {
        self.details = details;
        self
    }

    /// Hand the game to a new owner. Only trade settlement calls this.
    #[must_use]
    pub(crate) fn with_owner(mut self, owner: UserId) -> Self {
        self.owner = owner;
        self
    }
}

/// Listing payload ready for insertion.
#[derive(Debug, Clone)]
pub struct NewGame {
    /// Initial owner.
    pub owner: UserId,
    /// Descriptive attributes.
    pub details: GameDetails,
}
