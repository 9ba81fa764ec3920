//! Decomposition of accessor paths
//!
//! An accessor path names an item, a chain of members and optionally a method call:
//!
//! ```text
//! list.inner.values push: 1, x
//! ^^^^ ^^^^^ ^^^^^^ ^^^^  ^^^^
//! item  members     method parameters
//! ```

use itertools::Itertools;
use unic_units::Unit;

pub fn decompose(text: &str) -> Unit {
    let text = text.split_whitespace().join(" ");
    let (path, call) = match text.split_once(' ') {
        Some((path, call)) => (path, Some(call)),
        None => (text.as_str(), None),
    };

    let mut segments = path.split('.');
    let item = segments.next().unwrap_or_default().to_string();
    let members = segments
        .filter(|member| !member.is_empty())
        .map(str::to_string)
        .collect();

    let (method, parameters) = match call {
        Some(call) => {
            let (name, parameters) = match call.split_once(':') {
                Some((name, parameters)) => (name.trim(), parameters),
                None => (call.trim(), ""),
            };
            let parameters = parameters
                .split(',')
                .map(str::trim)
                .filter(|parameter| !parameter.is_empty())
                .map(str::to_string)
                .collect();
            ((!name.is_empty()).then(|| name.to_string()), parameters)
        }
        None => (None, vec![]),
    };

    Unit::Accessor {
        item,
        members,
        method,
        parameters,
    }
}
