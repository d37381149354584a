//! Reading of the events and their pair collections from a text file
//!
//! The format is line-oriented, with whitespace-separated fields:
//!
//! ```text
//! # comment
//! event <run> <lumi> <event> <number of pairs | missing>
//! pair <vx> <vy> <vz> <chi2> <ndof> <index1> <px1> <py1> <pz1> <E1> <index2> <px2> <py2> <pz2> <E2>
//! ```
//!
//! Each event line is followed by as many pair lines as it announces. Pair
//! lines written by the filter itself carry five more fields (the missing
//! 4-momentum and mass), so that its output can be fed to another filter.
//!
//! A pair line that cannot be parsed drops the collection of its event, which
//! is then processed as missing. A broken event header, or an event with fewer
//! pair lines than announced, is fatal.

use crate::{
    event::{Daughter, Event, EventId, PairCandidate},
    momentum::Momentum,
    numeric::Float,
    Result,
};

use eyre::{bail, ensure, eyre, WrapErr};
use nalgebra::Vector3;

use std::{fs, path::Path, str::FromStr};

/// Number of fields on a pair line, including the "pair" keyword
const PAIR_FIELDS: usize = 16;

/// Number of trailing fields written by the filter on kept pairs (missing
/// 4-momentum and mass), which are ignored on input
pub const RECONSTRUCTED_FIELDS: usize = 5;

/// Load all events from an input file
pub fn load_events(path: &Path) -> Result<Vec<Event>> {
    let data = fs::read_to_string(path)
        .wrap_err_with(|| format!("Could not read input file {}", path.display()))?;
    parse_events(&data).wrap_err_with(|| format!("Malformed input file {}", path.display()))
}

/// Parse events from the contents of an input file
pub fn parse_events(data: &str) -> Result<Vec<Event>> {
    // Iterate over meaningful lines, keeping track of line numbers
    let mut lines = data
        .lines()
        .enumerate()
        .map(|(idx, line)| (idx + 1, line.trim()))
        .filter(|(_, line)| !line.is_empty() && !line.starts_with('#'));

    let mut events = Vec::new();
    while let Some((line_no, line)) = lines.next() {
        let (id, num_pairs) = parse_header(line)
            .wrap_err_with(|| format!("Bad event header on line {}", line_no))?;
        let pairs = match num_pairs {
            None => None,
            Some(num_pairs) => parse_collection(&mut lines, id, num_pairs)?,
        };
        events.push(Event::new(id, pairs));
    }
    Ok(events)
}

/// Parse the pair lines announced by an event header
///
/// A malformed pair makes the whole collection unusable, and the event is then
/// handled as if the collection were missing. Running out of lines, or running
/// into the next event header, means the file itself is out of sync.
///
fn parse_collection<'data>(
    lines: &mut impl Iterator<Item = (usize, &'data str)>,
    id: EventId,
    num_pairs: usize,
) -> Result<Option<Vec<PairCandidate>>> {
    let mut pairs = Some(Vec::with_capacity(num_pairs));
    for _ in 0..num_pairs {
        let (line_no, line) = lines
            .next()
            .ok_or_else(|| eyre!("Event {} ended before its {} pairs", id, num_pairs))?;
        ensure!(
            line.split_whitespace().next() != Some("event"),
            "Event {} ended on line {} before its {} pairs",
            id,
            line_no,
            num_pairs
        );
        match parse_pair(line) {
            Ok(pair) => {
                if let Some(pairs) = pairs.as_mut() {
                    pairs.push(pair);
                }
            }
            Err(err) => {
                tracing::warn!(
                    line = line_no,
                    event = %id,
                    error = %format!("{:#}", err),
                    "Bad pair, treating the collection as missing"
                );
                pairs = None;
            }
        }
    }
    Ok(pairs)
}

/// Parse an event header line into the event identity and number of pairs
fn parse_header(line: &str) -> Result<(EventId, Option<usize>)> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    ensure!(
        fields[0] == "event" && fields.len() == 5,
        "Expected \"event <run> <lumi> <event> <npairs>\", got {:?}",
        line
    );
    let id = EventId {
        run: parse_field(fields[1], "run")?,
        lumi: parse_field(fields[2], "lumi")?,
        event: parse_field(fields[3], "event")?,
    };
    let num_pairs = match fields[4] {
        "missing" => None,
        n => Some(parse_field::<usize>(n, "number of pairs")?),
    };
    Ok((id, num_pairs))
}

/// Parse a single pair line
fn parse_pair(line: &str) -> Result<PairCandidate> {
    let fields = line.split_whitespace().collect::<Vec<_>>();
    let num_fields = fields.len();
    if fields[0] != "pair"
        || (num_fields != PAIR_FIELDS && num_fields != PAIR_FIELDS + RECONSTRUCTED_FIELDS)
    {
        bail!("Expected a pair line with {} fields, got {:?}", PAIR_FIELDS, line);
    }
    let float = |idx: usize, name: &str| parse_field::<Float>(fields[idx], name);
    let daughter = |first: usize| -> Result<Daughter> {
        Ok(Daughter {
            index: parse_field(fields[first], "daughter index")?,
            p4: Momentum::new(
                float(first + 1, "px")?,
                float(first + 2, "py")?,
                float(first + 3, "pz")?,
                float(first + 4, "E")?,
            ),
        })
    };
    Ok(PairCandidate::new(
        Vector3::new(float(1, "vx")?, float(2, "vy")?, float(3, "vz")?),
        float(4, "chi2")?,
        float(5, "ndof")?,
        [daughter(6)?, daughter(11)?],
    ))
}

/// Parse one field, naming it in the error message
fn parse_field<T: FromStr>(data: &str, name: &str) -> Result<T>
where
    <T as FromStr>::Err: std::error::Error + Send + Sync + 'static,
{
    data.parse::<T>()
        .wrap_err_with(|| format!("Could not parse {} from {:?}", name, data))
}
