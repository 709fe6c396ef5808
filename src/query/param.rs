use super::category::Category;
use crate::error::QueryError;

/// A single query-string parameter.
///
/// An empty value means "not set": the URL builder drops it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub value: String,
}

impl Param {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }

    /// Build parameters from a flat `key, value, key, value, ...` list.
    pub fn from_pairs<S: AsRef<str>>(flat: &[S]) -> Result<Vec<Param>, QueryError> {
        if flat.len() % 2 != 0 {
            return Err(QueryError::OddParameterCount(flat.len()));
        }
        Ok(flat
            .chunks_exact(2)
            .map(|pair| Param::new(pair[0].as_ref(), pair[1].as_ref()))
            .collect())
    }
}

/// Restrict a music search to an album title.
pub fn album(a: &str) -> Param {
    Param::new("album", a)
}

/// The key used to access the API.
pub fn apikey(k: &str) -> Param {
    Param::new("apikey", k)
}

/// Restrict a music search to an artist.
pub fn artist(a: &str) -> Param {
    Param::new("artist", a)
}

/// Restrict a book search to an author.
pub fn author(a: &str) -> Param {
    Param::new("author", a)
}

/// Media categories to search within, comma separated.
pub fn categories(cats: &[Category]) -> Param {
    let ids: Vec<String> = cats.iter().map(|c| c.id().to_string()).collect();
    Param::new("cat", ids.join(","))
}

/// Restrict a TV search to an episode, formatted `E03`.
pub fn episode(e: u32) -> Param {
    Param::new("ep", format!("E{:02}", e))
}

pub fn genre(g: &str) -> Param {
    Param::new("genre", g)
}

/// IMDB id of the title, without the `tt` prefix.
pub fn imdb_id(i: u32) -> Param {
    Param::new("imdbid", i.to_string())
}

/// Ask the server for JSON output.
pub fn json() -> Param {
    Param::new("o", "json")
}

/// Restrict a music search to a publisher or label.
pub fn label(l: &str) -> Param {
    Param::new("label", l)
}

/// Maximum number of results to return.
pub fn limit(l: u32) -> Param {
    Param::new("limit", l.to_string())
}

/// Only results uploaded in the last `days` days.
pub fn max_age(days: u32) -> Param {
    Param::new("maxage", days.to_string())
}

/// Start results at `o`. Re-run a query with a larger offset to page
/// through more results than the server returns at once.
pub fn offset(o: u32) -> Param {
    Param::new("offset", o.to_string())
}

/// Free-text search term.
pub fn query(q: &str) -> Param {
    Param::new("q", q)
}

/// Restrict a TV search to a season, formatted `S05`.
pub fn season(s: u32) -> Param {
    Param::new("season", format!("S{:02}", s))
}

pub fn title(t: &str) -> Param {
    Param::new("title", t)
}

pub fn track(t: &str) -> Param {
    Param::new("track", t)
}

/// The request type (`t`): `search`, `tvsearch`, `movie`, `caps`, ...
pub fn request_type(t: &str) -> Param {
    Param::new("t", t)
}

/// Ask the server for XML output.
pub fn xml() -> Param {
    Param::new("o", "xml")
}

pub fn year(y: &str) -> Param {
    Param::new("year", y)
}

/// TVRage id of a show.
pub fn tvrage_id(id: &str) -> Param {
    Param::new("rid", id)
}

pub fn tvdb_id(id: &str) -> Param {
    Param::new("tvdbid", id)
}

pub fn trakt_id(id: &str) -> Param {
    Param::new("traktid", id)
}

pub fn tvmaze_id(id: &str) -> Param {
    Param::new("tvmazeid", id)
}

pub fn tmdb_id(id: &str) -> Param {
    Param::new("tmdbid", id)
}

/// Include all extended attributes in results. Sent with every search.
pub(crate) fn extended() -> Param {
    Param::new("extended", "1")
}

/// The id of an NZB to fetch with `t=get`.
pub(crate) fn nzb_id(id: &str) -> Param {
    Param::new("id", id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_padding() {
        assert_eq!(season(5), Param::new("season", "S05"));
        assert_eq!(episode(3), Param::new("ep", "E03"));
        assert_eq!(season(12).value, "S12");
        assert_eq!(episode(123).value, "E123");
    }

    #[test]
    fn test_integer_params() {
        assert_eq!(imdb_id(133093).value, "133093");
        assert_eq!(limit(100), Param::new("limit", "100"));
        assert_eq!(offset(0).value, "0");
        assert_eq!(max_age(30).name, "maxage");
    }

    #[test]
    fn test_categories_joined() {
        let p = categories(&[Category::MOVIES_HD, Category::TV_HD]);
        assert_eq!(p, Param::new("cat", "2040,5040"));
        assert_eq!(categories(&[]).value, "");
    }

    #[test]
    fn test_output_format() {
        assert_eq!(json(), Param::new("o", "json"));
        assert_eq!(xml(), Param::new("o", "xml"));
    }

    #[test]
    fn test_from_pairs() {
        let params = Param::from_pairs(&["q", "linux", "limit", "5"]).unwrap();
        assert_eq!(params, vec![Param::new("q", "linux"), Param::new("limit", "5")]);

        let err = Param::from_pairs(&["q", "linux", "limit"]).unwrap_err();
        assert!(matches!(err, QueryError::OddParameterCount(3)));

        assert!(Param::from_pairs::<&str>(&[]).unwrap().is_empty());
    }
}
