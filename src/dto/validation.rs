//! Validation helpers for DTOs.

use validator::ValidationError;

use crate::state::room::{ANSWER_TIME_CHOICES, CLIP_DURATION_CHOICES, ROOM_CODE_LENGTH};

/// Validates that a clip duration is one of the offered choices.
pub fn validate_clip_duration(value: u8) -> Result<(), ValidationError> {
    if CLIP_DURATION_CHOICES.contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("clip_duration");
        err.message = Some(format!("clip duration must be one of {CLIP_DURATION_CHOICES:?} seconds").into());
        Err(err)
    }
}

/// Validates that an answer window is one of the offered choices.
pub fn validate_answer_time(value: u8) -> Result<(), ValidationError> {
    if ANSWER_TIME_CHOICES.contains(&value) {
        Ok(())
    } else {
        let mut err = ValidationError::new("answer_time");
        err.message = Some(format!("answer time must be one of {ANSWER_TIME_CHOICES:?} seconds").into());
        Err(err)
    }
}

/// Validates that a room code is exactly six uppercase alphanumeric characters.
pub fn validate_room_code(code: &str) -> Result<(), ValidationError> {
    if code.len() != ROOM_CODE_LENGTH {
        let mut err = ValidationError::new("room_code_length");
        err.message = Some(
            format!(
                "room code must be exactly {ROOM_CODE_LENGTH} characters (got {})",
                code.len()
            )
            .into(),
        );
        return Err(err);
    }

    if !code
        .chars()
        .all(|c| c.is_ascii_alphanumeric() && !c.is_ascii_lowercase())
    {
        let mut err = ValidationError::new("room_code_format");
        err.message = Some("room code must contain only uppercase alphanumeric characters".into());
        return Err(err);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_clip_duration() {
        assert!(validate_clip_duration(3).is_ok());
        assert!(validate_clip_duration(4).is_ok());
        assert!(validate_clip_duration(5).is_ok());
        assert!(validate_clip_duration(2).is_err());
        assert!(validate_clip_duration(6).is_err());
    }

    #[test]
    fn test_validate_answer_time() {
        assert!(validate_answer_time(8).is_ok());
        assert!(validate_answer_time(10).is_ok());
        assert!(validate_answer_time(12).is_ok());
        assert!(validate_answer_time(9).is_err());
        assert!(validate_answer_time(0).is_err());
    }

    #[test]
    fn test_validate_room_code() {
        assert!(validate_room_code("AB12CD").is_ok());
        assert!(validate_room_code("DEMO12").is_ok());
        assert!(validate_room_code("ab12cd").is_err()); // lowercase
        assert!(validate_room_code("AB12C").is_err()); // too short
        assert!(validate_room_code("AB12CDE").is_err()); // too long
        assert!(validate_room_code("AB 2CD").is_err()); // space
    }
}
