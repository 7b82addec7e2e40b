use super::macros::string_enum;
use crate::error::ClockError;

string_enum! {
    /// Approval state of a day's overtime request. Independent of the
    /// attendance status; time-out only reads it.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub enum OvertimeRequestStatus {
        #[default]
        NoRequest => "NONE",
        Requested => "REQUESTED",
        Accepted => "ACCEPTED",
        Rejected => "REJECTED",
    }
}

impl OvertimeRequestStatus {
    pub fn request(self) -> Result<Self, ClockError> {
        match self {
            Self::NoRequest | Self::Rejected => Ok(Self::Requested),
            from => Err(ClockError::InvalidOvertimeTransition {
                from,
                action: "request",
            }),
        }
    }

    pub fn accept(self) -> Result<Self, ClockError> {
        match self {
            Self::Requested => Ok(Self::Accepted),
            from => Err(ClockError::InvalidOvertimeTransition {
                from,
                action: "accept",
            }),
        }
    }

    pub fn reject(self) -> Result<Self, ClockError> {
        match self {
            Self::Requested => Ok(Self::Rejected),
            from => Err(ClockError::InvalidOvertimeTransition {
                from,
                action: "reject",
            }),
        }
    }

    pub fn is_accepted(self) -> bool {
        self == Self::Accepted
    }
}
