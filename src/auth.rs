//! Roster-backed login and registration. The roster is whatever the sync
//! layer last delivered; credentials are matched verbatim against it.

use std::fmt;

use crate::types::User;

#[derive(Clone, Debug, PartialEq)]
pub enum AuthError {
    MissingFields,
    BadCredentials,
    NameTaken,
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AuthError::MissingFields => write!(f, "Rellena todos los campos"),
            AuthError::BadCredentials => write!(f, "Usuario o contraseña incorrectos"),
            AuthError::NameTaken => write!(f, "Ese nombre ya está pillado"),
        }
    }
}

/// Name matches case-insensitively, the secret must match exactly. One
/// combined error for unknown user and wrong password.
pub fn authenticate<'a>(
    roster: &'a [User],
    name: &str,
    password: &str,
) -> Result<&'a User, AuthError> {
    let name = name.trim();
    if name.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    roster
        .iter()
        .find(|u| u.name.to_lowercase() == name.to_lowercase() && u.password == password)
        .ok_or(AuthError::BadCredentials)
}

/// Build a new roster entry. Display names are unique case-insensitively;
/// the avatar comes from DiceBear, seeded so re-registering the same name
/// later still gets a fresh face.
pub fn register(roster: &[User], id: String, name: &str, password: &str) -> Result<User, AuthError> {
    let name = name.trim();
    if name.is_empty() || password.is_empty() {
        return Err(AuthError::MissingFields);
    }
    if roster
        .iter()
        .any(|u| u.name.to_lowercase() == name.to_lowercase())
    {
        return Err(AuthError::NameTaken);
    }
    let avatar = format!(
        "https://api.dicebear.com/7.x/avataaars/svg?seed={}{}",
        name, id
    );
    Ok(User {
        id,
        name: name.to_string(),
        password: password.to_string(),
        avatar,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn roster() -> Vec<User> {
        vec![User {
            id: "u-1".into(),
            name: "Marta".into(),
            password: "hierro".into(),
            avatar: String::new(),
        }]
    }

    #[test]
    fn login_ignores_name_case_but_not_password() {
        let roster = roster();
        assert!(authenticate(&roster, "marta", "hierro").is_ok());
        assert!(authenticate(&roster, "MARTA", "hierro").is_ok());
        assert_eq!(
            authenticate(&roster, "Marta", "Hierro"),
            Err(AuthError::BadCredentials)
        );
        assert_eq!(
            authenticate(&roster, "Pedro", "hierro"),
            Err(AuthError::BadCredentials)
        );
    }

    #[test]
    fn blank_credentials_are_rejected_before_matching() {
        let roster = roster();
        assert_eq!(
            authenticate(&roster, "", "hierro"),
            Err(AuthError::MissingFields)
        );
        assert_eq!(
            authenticate(&roster, "Marta", ""),
            Err(AuthError::MissingFields)
        );
    }

    #[test]
    fn duplicate_names_are_rejected_case_insensitively() {
        let roster = roster();
        assert_eq!(
            register(&roster, "u-2".into(), "marta", "otra"),
            Err(AuthError::NameTaken)
        );
        assert_eq!(
            register(&roster, "u-2".into(), " MARTA ", "otra"),
            Err(AuthError::NameTaken)
        );
    }

    #[test]
    fn registration_trims_the_name_and_seeds_the_avatar() {
        let user = register(&roster(), "u-2".into(), "  Pedro ", "clave").unwrap();
        assert_eq!(user.name, "Pedro");
        assert!(user.avatar.contains("seed=Pedrou-2"));
    }
}
