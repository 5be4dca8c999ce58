//! Client-side route table.
//!
//! Navigation itself stays in the JS shell; this module only interprets
//! and produces path strings for `/`, `/recents`, `/editor/:fileId`, and
//! the catch-all.

/// A parsed client-side route.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    Home,
    Recents,
    Editor { file_id: String },
    NotFound,
}

impl Route {
    /// Parse a location path. Trailing slashes are tolerated; anything
    /// unrecognized is the 404 route.
    pub fn parse(path: &str) -> Route {
        let trimmed = path.trim_end_matches('/');
        match trimmed {
            "" => Route::Home,
            "/recents" => Route::Recents,
            _ => match trimmed.strip_prefix("/editor/") {
                Some(file_id) if !file_id.is_empty() && !file_id.contains('/') => Route::Editor {
                    file_id: file_id.to_string(),
                },
                _ => Route::NotFound,
            },
        }
    }

    pub fn to_path(&self) -> String {
        match self {
            Route::Home => "/".to_string(),
            Route::Recents => "/recents".to_string(),
            Route::Editor { file_id } => format!("/editor/{file_id}"),
            Route::NotFound => "/404".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_known_routes() {
        assert_eq!(Route::parse("/"), Route::Home);
        assert_eq!(Route::parse("/recents"), Route::Recents);
        assert_eq!(Route::parse("/recents/"), Route::Recents);
        assert_eq!(
            Route::parse("/editor/file1"),
            Route::Editor {
                file_id: "file1".into()
            }
        );
        assert_eq!(
            Route::parse("/editor/file1/"),
            Route::Editor {
                file_id: "file1".into()
            }
        );
    }

    #[test]
    fn unknown_paths_are_not_found() {
        assert_eq!(Route::parse("/settings"), Route::NotFound);
        assert_eq!(Route::parse("/editor"), Route::NotFound);
        assert_eq!(Route::parse("/editor/"), Route::NotFound);
        assert_eq!(Route::parse("/editor/a/b"), Route::NotFound);
    }

    #[test]
    fn paths_roundtrip() {
        for path in ["/", "/recents", "/editor/file3"] {
            assert_eq!(Route::parse(path).to_path(), path);
        }
    }
}
