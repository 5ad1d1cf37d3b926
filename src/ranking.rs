use jiff::{Timestamp, civil, tz::TimeZone};

use crate::{
    error::{AppError, AppResult},
    models::TopMovie,
    store::CommentCount,
};

/// Inclusive bounds on comment creation time, in Unix milliseconds.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct TimeWindow {
    pub from: Option<i64>,
    pub to: Option<i64>,
}

impl TimeWindow {
    /// Builds a window from raw query parameters. Empty strings count as absent.
    pub fn from_query(from: Option<&str>, to: Option<&str>) -> AppResult<Self> {
        Ok(Self { from: parse_bound("from", from)?, to: parse_bound("to", to)? })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }
}

fn parse_bound(name: &str, raw: Option<&str>) -> AppResult<Option<i64>> {
    let Some(raw) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    let ts = parse_timestamp(raw)
        .map_err(|e| AppError::Validation(format!("{name}: invalid timestamp {raw:?}: {e}")))?;
    Ok(Some(ts.as_millisecond()))
}

/// Accepts RFC 3339 instants; zone-less datetimes and plain dates are UTC.
pub fn parse_timestamp(raw: &str) -> Result<Timestamp, jiff::Error> {
    if let Ok(ts) = raw.parse::<Timestamp>() {
        return Ok(ts);
    }
    let dt: civil::DateTime = raw.parse()?;
    Ok(dt.to_zoned(TimeZone::UTC)?.timestamp())
}

/// Orders movies by comment count and assigns dense ranks.
///
/// Equal counts share a rank and each lower count is exactly one rank below
/// the previous one, so `[3, 3, 1]` ranks as `[1, 1, 2]`.
pub fn dense_rank(mut counts: Vec<CommentCount>) -> Vec<TopMovie> {
    counts.sort_by(|a, b| b.total_comments.cmp(&a.total_comments));

    let mut ranked = Vec::with_capacity(counts.len());
    let mut previous: Option<TopMovie> = None;
    for count in counts {
        let rank = match previous {
            None => 1,
            Some(prev) if prev.total_comments == count.total_comments => prev.rank,
            Some(prev) => prev.rank + 1,
        };
        let top =
            TopMovie { movie_id: count.movie_id, rank, total_comments: count.total_comments };
        previous = Some(top);
        ranked.push(top);
    }
    ranked
}
