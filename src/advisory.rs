use crate::time::{Time, Window};
use regex::Regex;
use std::sync::LazyLock;
use thiserror::Error;

/// A closure notice for the runway whose time window cannot be read.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("closure notice for runway {runway} has an unreadable window: {notice:?}")]
pub struct MalformedAdvisory {
    pub runway: String,
    pub notice: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Closure<'a> {
    pub runway: &'a str,
    pub window: Window,
    pub notice: &'a str,
}

static CLOSURE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:RUNWAY|PISTA)\s+(\S+)\s+(?:CLOSED|FECHADA)")
        .expect("closure notice pattern is valid")
});

/// A closure named in a notice line; `window` is `None` when the text after the
/// keyword is not a readable `HH:MM-HH:MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mention<'a> {
    pub runway: &'a str,
    pub window: Option<Window>,
}

/// Every closure named in `notice`, in line order. The window is the token
/// right after the keyword, with or without a separating blank.
pub fn mentions(notice: &str) -> impl Iterator<Item = Mention<'_>> {
    CLOSURE.captures_iter(notice).filter_map(move |caps| {
        let keyword = caps.get(0)?;
        let window = notice[keyword.end()..]
            .trim_start_matches([' ', '\t'])
            .split_whitespace()
            .next()
            .and_then(|token| token.parse::<Window>().ok());
        Some(Mention {
            runway: caps.get(1)?.as_str(),
            window,
        })
    })
}

/// Closure notices in `notices` naming `runway`, in file order.
pub fn closures_for<'a>(
    runway: &str,
    notices: &'a [String],
) -> Result<Vec<Closure<'a>>, MalformedAdvisory> {
    let mut closures = vec![];
    for notice in notices {
        for mention in mentions(notice).filter(|m| m.runway == runway) {
            let window = mention.window.ok_or_else(|| MalformedAdvisory {
                runway: runway.to_string(),
                notice: notice.clone(),
            })?;
            closures.push(Closure {
                runway: mention.runway,
                window,
                notice,
            });
        }
    }
    Ok(closures)
}

/// True when any closure notice for `runway` covers `instant`, both ends inclusive.
pub fn is_runway_closed_by_notice(
    runway: &str,
    notices: &[String],
    instant: Time,
) -> Result<bool, MalformedAdvisory> {
    Ok(closures_for(runway, notices)?
        .iter()
        .any(|closure| closure.window.contains(instant)))
}

/// Every readable closure that is active at `instant`, across all runways.
pub fn active_closures(notices: &[String], instant: Time) -> Vec<Closure<'_>> {
    notices
        .iter()
        .flat_map(|notice| {
            mentions(notice).filter_map(move |mention| {
                Some(Closure {
                    runway: mention.runway,
                    window: mention.window?,
                    notice,
                })
            })
        })
        .filter(|closure| closure.window.contains(instant))
        .collect()
}

/// True when `notice` names a closure whose window cannot be read.
pub fn is_unreadable(notice: &str) -> bool {
    mentions(notice).any(|m| m.window.is_none())
}
