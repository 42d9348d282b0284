use std::fmt;

use serde::{Deserialize, Serialize};

/// Views the client can move to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Route {
    Gallery,
    Create,
    Result { job_id: String, letter: String },
    Video { id: String },
}

impl Route {
    pub fn path(&self) -> String {
        match self {
            Route::Gallery => "/".to_string(),
            Route::Create => "/create".to_string(),
            Route::Result { .. } => "/result".to_string(),
            Route::Video { id } => format!("/video/{id}"),
        }
    }

    pub fn query_params(&self) -> Vec<(&'static str, &str)> {
        match self {
            Route::Result { job_id, letter } => {
                vec![("id", job_id.as_str()), ("letter", letter.as_str())]
            }
            _ => Vec::new(),
        }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Route::Result { job_id, .. } => write!(f, "{}?id={job_id}", self.path()),
            _ => f.write_str(&self.path()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn result_route_carries_job_and_letter() {
        let route = Route::Result {
            job_id: "J1".to_string(),
            letter: "Dear Rae".to_string(),
        };
        assert_eq!(route.path(), "/result");
        assert_eq!(route.query_params(), vec![("id", "J1"), ("letter", "Dear Rae")]);
        assert_eq!(route.to_string(), "/result?id=J1");
        assert_eq!(Route::Video { id: "42".to_string() }.path(), "/video/42");
        assert!(Route::Gallery.query_params().is_empty());
    }
}
