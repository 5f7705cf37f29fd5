use serde::Deserialize;

/// Field errors surfaced to the user; the submitted form is re-rendered with
/// these as banners and nothing is persisted.
pub type FieldErrors = Vec<String>;

#[derive(Debug, Deserialize)]
pub struct RoomForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub topic: String,
    #[serde(default)]
    pub description: String,
}

#[derive(Debug)]
pub struct ValidRoom {
    pub name: String,
    pub topic: String,
    pub description: Option<String>,
}

impl RoomForm {
    /// Host and participants are never form-editable; only these three
    /// fields pass through.
    pub fn validate(self) -> Result<ValidRoom, FieldErrors> {
        let mut errors = FieldErrors::new();

        let name = self.name.trim().to_owned();
        if name.is_empty() {
            errors.push("Room name is required.".to_owned());
        }

        let topic = self.topic.trim().to_owned();
        if topic.is_empty() {
            errors.push("Topic is required.".to_owned());
        }

        if !errors.is_empty() {
            return Err(errors);
        }

        let description = self.description.trim();
        Ok(ValidRoom {
            name,
            topic,
            description: (!description.is_empty()).then(|| description.to_owned()),
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UserForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

#[derive(Debug)]
pub struct ValidUser {
    pub username: String,
    pub email: String,
}

impl UserForm {
    pub fn validate(self) -> Result<ValidUser, FieldErrors> {
        let mut errors = FieldErrors::new();

        // Lowercased for case-insensitive identity, same as registration.
        let username = self.username.trim().to_lowercase();
        if username.is_empty() {
            errors.push("Username is required.".to_owned());
        }

        let email = self.email.trim().to_owned();
        if !email.is_empty() && !email.contains('@') {
            errors.push("Email address is not valid.".to_owned());
        }

        if errors.is_empty() {
            Ok(ValidUser { username, email })
        } else {
            Err(errors)
        }
    }
}

#[derive(Debug, Deserialize)]
pub struct RegisterForm {
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub password1: String,
    #[serde(default)]
    pub password2: String,
}

#[derive(Debug)]
pub struct ValidRegistration {
    pub username: String,
    pub password: String,
}

impl RegisterForm {
    pub fn validate(self) -> Result<ValidRegistration, FieldErrors> {
        let mut errors = FieldErrors::new();

        let username = self.username.trim().to_lowercase();
        if username.is_empty() {
            errors.push("Username is required.".to_owned());
        }

        if self.password1.len() < 8 {
            errors.push("Password must be at least 8 characters.".to_owned());
        }
        if self.password1 != self.password2 {
            errors.push("Passwords do not match.".to_owned());
        }

        if errors.is_empty() {
            Ok(ValidRegistration {
                username,
                password: self.password1,
            })
        } else {
            Err(errors)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn room_form_trims_and_blanks_description() {
        let valid = RoomForm {
            name: "  Chess Club ".to_owned(),
            topic: "Games".to_owned(),
            description: "   ".to_owned(),
        }
        .validate()
        .unwrap();

        assert_eq!(valid.name, "Chess Club");
        assert_eq!(valid.description, None);
    }

    #[test]
    fn room_form_requires_name_and_topic() {
        let errors = RoomForm {
            name: String::new(),
            topic: "  ".to_owned(),
            description: "something".to_owned(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn user_form_lowercases_username() {
        let valid = UserForm {
            username: "Alice".to_owned(),
            email: "alice@example.com".to_owned(),
        }
        .validate()
        .unwrap();

        assert_eq!(valid.username, "alice");
    }

    #[test]
    fn user_form_rejects_bad_email() {
        let errors = UserForm {
            username: "alice".to_owned(),
            email: "not-an-address".to_owned(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn registration_checks_password_pair() {
        let errors = RegisterForm {
            username: "Alice".to_owned(),
            password1: "short".to_owned(),
            password2: "different".to_owned(),
        }
        .validate()
        .unwrap_err();

        assert_eq!(errors.len(), 2);

        let valid = RegisterForm {
            username: "Alice".to_owned(),
            password1: "long enough".to_owned(),
            password2: "long enough".to_owned(),
        }
        .validate()
        .unwrap();
        assert_eq!(valid.username, "alice");
    }
}
