use super::{ensure, require, ValidationResult, EMAIL_REGEX, NAME_REGEX, PHONE_NUMBER_REGEX};
use crate::inputs::{LoginInput, SignUpInput};
use crate::models::Role;

const MIN_NAME_LEN: usize = 3;
const MAX_NAME_LEN: usize = 21;
const MIN_PASSWORD_LEN: usize = 6;

pub fn validate_sign_up(input: &SignUpInput) -> ValidationResult {
    validate_person_name(&input.first_name, "FirstName")?;
    validate_person_name(&input.last_name, "LastName")?;

    require(&input.email, "Error: The Email is required.")?;
    ensure(EMAIL_REGEX.is_match(&input.email), "Error: The Email is invalid.")?;

    require(&input.phone_number, "Error: The PhoneNumber is required.")?;
    ensure(
        PHONE_NUMBER_REGEX.is_match(&input.phone_number),
        "Error: The PhoneNumber is invalid.",
    )?;
    require(&input.phone_prefix, "Error: The PhonePrefix is required.")?;

    ensure(input.age > 0, "Error: The Age must be a positive integer.")?;

    require(&input.password, "Error: The Password is required.")?;
    ensure(
        input.password.chars().count() >= MIN_PASSWORD_LEN,
        "Error: The Password must have at least 6 chars.",
    )?;

    require(&input.role, "Error: The Role is required.")?;
    let self_assignable = input
        .role
        .parse::<Role>()
        .map(|role| role.is_self_assignable())
        .unwrap_or(false);
    ensure(
        self_assignable,
        "Error: The Role is invalid. Valid types are Buyer and Organizer",
    )
}

pub fn validate_login(input: &LoginInput) -> ValidationResult {
    require(&input.email, "Error: The Email is required.")?;
    ensure(EMAIL_REGEX.is_match(&input.email), "Error: The Email is invalid.")?;
    // Checking the password itself belongs to the authenticator.
    require(&input.password, "Error: The Password is required.")
}

fn validate_person_name(value: &str, field: &str) -> ValidationResult {
    require(value, &format!("Error: The {field} is required."))?;
    let len = value.chars().count();
    ensure(
        (MIN_NAME_LEN..=MAX_NAME_LEN).contains(&len),
        &format!("Error: The {field} must have at least 3 letters and at most 21."),
    )?;
    ensure(
        NAME_REGEX.is_match(value),
        &format!("Error: The {field} must contain only letters."),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_sign_up() -> SignUpInput {
        SignUpInput {
            first_name: "Jane".to_string(),
            last_name: "Doe".to_string(),
            email: "jane.doe@example.com".to_string(),
            phone_number: "723-456-7890".to_string(),
            phone_prefix: "+40".to_string(),
            age: 28,
            is_student: false,
            password: "secret1".to_string(),
            role: "Buyer".to_string(),
        }
    }

    fn message(input: &SignUpInput) -> String {
        validate_sign_up(input).unwrap_err().into_message()
    }

    #[test]
    fn test_valid_sign_up_passes() {
        assert!(validate_sign_up(&valid_sign_up()).is_ok());
        let organizer = SignUpInput {
            role: "Organizer".to_string(),
            ..valid_sign_up()
        };
        assert!(validate_sign_up(&organizer).is_ok());
    }

    #[test]
    fn test_first_name_rules_in_order() {
        let mut input = valid_sign_up();
        input.first_name = String::new();
        assert_eq!(message(&input), "Error: The FirstName is required.");

        input.first_name = "Jo".to_string();
        assert_eq!(
            message(&input),
            "Error: The FirstName must have at least 3 letters and at most 21."
        );

        input.first_name = "A".repeat(22);
        assert_eq!(
            message(&input),
            "Error: The FirstName must have at least 3 letters and at most 21."
        );

        input.first_name = "Jane2".to_string();
        assert_eq!(message(&input), "Error: The FirstName must contain only letters.");
    }

    #[test]
    fn test_first_failing_rule_wins() {
        let input = SignUpInput {
            first_name: String::new(),
            email: "not-an-email".to_string(),
            age: -1,
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The FirstName is required.");
    }

    #[test]
    fn test_last_name_is_checked_after_first_name() {
        let input = SignUpInput {
            last_name: "Do3".to_string(),
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The LastName must contain only letters.");
    }

    #[test]
    fn test_contact_rules() {
        let input = SignUpInput {
            email: "jane@".to_string(),
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The Email is invalid.");

        let input = SignUpInput {
            phone_number: "12345".to_string(),
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The PhoneNumber is invalid.");

        let input = SignUpInput {
            phone_prefix: String::new(),
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The PhonePrefix is required.");
    }

    #[test]
    fn test_age_and_password() {
        let input = SignUpInput {
            age: 0,
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The Age must be a positive integer.");

        let input = SignUpInput {
            password: "12345".to_string(),
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The Password must have at least 6 chars.");
    }

    #[test]
    fn test_admin_role_cannot_be_requested() {
        let input = SignUpInput {
            role: "Admin".to_string(),
            ..valid_sign_up()
        };
        assert_eq!(
            message(&input),
            "Error: The Role is invalid. Valid types are Buyer and Organizer"
        );

        let input = SignUpInput {
            role: String::new(),
            ..valid_sign_up()
        };
        assert_eq!(message(&input), "Error: The Role is required.");
    }

    #[test]
    fn test_login_rules() {
        let ok = LoginInput {
            email: "jane.doe@example.com".to_string(),
            password: "x".to_string(),
        };
        assert!(validate_login(&ok).is_ok());

        let missing_password = LoginInput {
            password: String::new(),
            ..ok.clone()
        };
        assert_eq!(
            validate_login(&missing_password).unwrap_err().message(),
            "Error: The Password is required."
        );

        let bad_email = LoginInput {
            email: "jane".to_string(),
            ..ok
        };
        assert_eq!(
            validate_login(&bad_email).unwrap_err().message(),
            "Error: The Email is invalid."
        );
    }
}
