use thiserror::Error;

pub type ServiceResult<T> = std::result::Result<T, ServiceError>;

/// The coordinator's error taxonomy. Each kind maps to exactly one HTTP
/// status at the boundary; rules violations inside the engine surface as
/// `BadAction` with the engine's reason attached.
#[derive(Clone, Debug, Error, PartialEq, Eq)]
pub enum ServiceError {
    #[error("{0}")]
    BadAction(String),

    #[error("{message}")]
    Conflict { message: String, current: u64, need_snapshot: bool },

    #[error("{0}")]
    Seat(String),

    #[error("game already finished")]
    Finished,

    #[error("{0}")]
    NotFound(String),
}

impl ServiceError {
    /// Rejection of a stale optimistic version; the current version travels
    /// with the error so clients can re-sync.
    pub fn stale_version(expected: u64, current: u64) -> ServiceError {
        ServiceError::Conflict {
            message: format!("version {expected} != {current}"),
            current,
            need_snapshot: false,
        }
    }

    /// Rejection of an out-of-range diff cursor; the client must take a
    /// fresh snapshot.
    pub fn resnapshot(since: i64, current: u64) -> ServiceError {
        ServiceError::Conflict {
            message: format!("since={since} is outside 0..={current}"),
            current,
            need_snapshot: true,
        }
    }

    /// The wire name of this error kind.
    pub fn kind(&self) -> &'static str {
        match self {
            ServiceError::BadAction(_) => "BadAction",
            ServiceError::Conflict { .. } => "Conflict",
            ServiceError::Seat(_) => "SeatError",
            ServiceError::Finished => "Finished",
            ServiceError::NotFound(_) => "NotFound",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_and_messages() {
        assert_eq!(ServiceError::BadAction("nope".into()).kind(), "BadAction");
        assert_eq!(ServiceError::Finished.kind(), "Finished");
        assert_eq!(ServiceError::Seat("seat taken".into()).kind(), "SeatError");

        let conflict = ServiceError::stale_version(0, 3);
        assert_eq!(conflict.kind(), "Conflict");
        assert_eq!(conflict.to_string(), "version 0 != 3");

        let ServiceError::Conflict { need_snapshot, current, .. } = ServiceError::resnapshot(-1, 2)
        else {
            panic!("expected a conflict");
        };
        assert!(need_snapshot);
        assert_eq!(current, 2);
    }
}
