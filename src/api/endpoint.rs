//! Backend endpoints. The HTTP verb is configured per endpoint because
//! the backend mixes POST-style reads with plain REST deletes.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Post,
    Delete,
}

impl HttpMethod {
    pub fn as_reqwest(self) -> reqwest::Method {
        match self {
            Self::Post => reqwest::Method::POST,
            Self::Delete => reqwest::Method::DELETE,
        }
    }
}

/// A backend route relative to the configured API base URL
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoint {
    pub method: HttpMethod,
    pub path: String,
}

impl Endpoint {
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            path: path.into(),
        }
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Delete,
            path: path.into(),
        }
    }

    /// `POST <resource>/get`
    pub fn list(resource: &str) -> Self {
        Self::post(format!("{resource}/get"))
    }

    /// `POST <resource>/create`
    pub fn create(resource: &str) -> Self {
        Self::post(format!("{resource}/create"))
    }

    /// `POST <resource>/update`, the record id travels in the body
    pub fn update(resource: &str) -> Self {
        Self::post(format!("{resource}/update"))
    }

    /// `DELETE <resource>/delete/<id>`, used for every resource
    pub fn remove(resource: &str, id: &str) -> Self {
        Self::delete(format!("{resource}/delete/{id}"))
    }
}

impl fmt::Display for Endpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} /{}", self.method.as_reqwest(), self.path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalogue_paths() {
        assert_eq!(Endpoint::list("blog").path, "blog/get");
        assert_eq!(Endpoint::create("blog").method, HttpMethod::Post);
        assert_eq!(Endpoint::update("event").path, "event/update");
        let delete = Endpoint::remove("team", "42");
        assert_eq!(delete.method, HttpMethod::Delete);
        assert_eq!(delete.path, "team/delete/42");
    }

    #[test]
    fn test_display() {
        assert_eq!(
            Endpoint::post("donation/create").to_string(),
            "POST /donation/create"
        );
    }
}
