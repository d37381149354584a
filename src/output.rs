//! This module is in charge of outputting the kept events and the run summary
//! to the standard output and various files

use crate::{
    event::NUM_DAUGHTERS,
    momentum::{MassConvention, Momentum, E, X, Y, Z},
    resacc::EventRecord,
    resfin::{write_entry, FinalResults},
    Result,
};

use eyre::WrapErr;
use time::{format_description::well_known::Rfc3339, OffsetDateTime};

use std::{
    fs::File,
    io::{self, BufWriter, Write},
    path::PathBuf,
    time::Duration,
};

/// Output the filter results to the console and to disk
pub fn dump_results(res_fin: &FinalResults, elapsed_time: Duration) -> Result<()> {
    let cfg = res_fin.cfg;

    // Print out the run summary on stdout
    {
        let mut stdout = io::stdout().lock();
        res_fin.write_summary(&mut stdout)?;
        write_entry(&mut stdout, "Elapsed time (s)", elapsed_time.as_secs_f64())?;
    }

    // Compute a timestamp of when the run ended
    let timestamp = OffsetDateTime::now_utc().format(&Rfc3339)?;

    // Write the kept events
    {
        let file = File::create(&cfg.output_file).wrap_err_with(|| {
            format!("Could not create output file {}", cfg.output_file.display())
        })?;
        let mut out = BufWriter::new(file);
        write_events(&mut out, &res_fin.records, cfg.mass_convention)?;
        out.flush()?;
    }
    tracing::info!(
        events = res_fin.records.len(),
        path = %cfg.output_file.display(),
        "Kept events written"
    );

    // Write the run summary next to them
    {
        let summary_path = {
            let mut path = cfg.output_file.clone().into_os_string();
            path.push(".summary");
            PathBuf::from(path)
        };
        let file = File::create(&summary_path).wrap_err_with(|| {
            format!("Could not create summary file {}", summary_path.display())
        })?;
        let mut out = BufWriter::new(file);
        writeln!(out, " {}", timestamp)?;
        writeln!(out, " ---------------------------------------------")?;
        res_fin.write_summary(&mut out)?;
        write_entry(&mut out, "Elapsed time (s)", elapsed_time.as_secs_f64())?;
        let per_event = elapsed_time.as_secs_f64() / (res_fin.events.max(1) as f64);
        write_entry(&mut out, "Elapsed time per event (s)", per_event)?;
        out.flush()?;
    }

    // ...and we're done
    Ok(())
}

/// Write kept events and their selected pairs, in the input file format
///
/// Pair lines carry the same fields as on input, with the daughters untouched,
/// followed by the missing 4-momentum and the missing mass. This lets another
/// filter run over the output, e.g. a target mass of 0 followed by a neutron.
///
pub fn write_events(
    out: &mut impl Write,
    records: &[EventRecord],
    convention: MassConvention,
) -> io::Result<()> {
    for record in records {
        let id = &record.id;
        writeln!(
            out,
            "event {} {} {} {}",
            id.run,
            id.lumi,
            id.event,
            record.retained.len()
        )?;
        for pair in &record.retained {
            write!(
                out,
                "pair {} {} {} {} {}",
                pair.vertex[X], pair.vertex[Y], pair.vertex[Z], pair.vertex_chi2, pair.vertex_ndof,
            )?;
            for idx in 0..NUM_DAUGHTERS {
                let daughter = pair.daughter(idx);
                write!(out, " {}", daughter.index)?;
                write_momentum(out, &daughter.p4)?;
            }
            write_momentum(out, pair.p4())?;
            writeln!(out, " {}", convention.invariant_mass(pair.p4()))?;
        }
    }
    Ok(())
}

/// Write the components of a 4-momentum, each preceded by a space
fn write_momentum(out: &mut impl Write, p4: &Momentum) -> io::Result<()> {
    write!(out, " {} {} {} {}", p4[X], p4[Y], p4[Z], p4[E])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        event::{tests::pair, EventId},
        filter::MassFilter,
        input::parse_events,
        numeric::Float,
        prescale::PrescaleGate,
        resacc::ResultsAccumulator,
        selection::{MassWindow, PairSelector},
    };

    const EVENTS: &str = "\
event 1 2 3 2
pair 0.1 0.2 3.0 1.5 1 0 0.8 -0.3 0.5 1.4916 4 -0.2 0.6 0.4 0.8987
pair 0.0 0.0 -1.0 0.3 1 1 0.2 0.1 -0.4 1.2064 5 0.3 0.2 0.1 0.6136
event 1 2 4 0
event 1 2 5 missing
event 1 2 6 1
pair -0.65 0.9 7.35 2.41 1 2 1.1 0.7 3.2 3.6139 0 0.9 -0.1 2.0 2.2488
";

    fn mass_filter(target_mass: Float) -> MassFilter {
        MassFilter::from_parts(
            PairSelector::new(
                MassWindow::new(-10000., 10000.),
                target_mass,
                MassConvention::Nan,
            ),
            PrescaleGate::new(0),
            "sParticles".to_owned(),
        )
    }

    fn write_to_string(results: &ResultsAccumulator) -> String {
        let mut buffer = Vec::new();
        write_events(&mut buffer, results.records(), MassConvention::Nan).unwrap();
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn kept_events_layout() {
        let records = [
            EventRecord {
                id: EventId {
                    run: 7,
                    lumi: 8,
                    event: 9,
                },
                retained: vec![pair([0., 0., 0., 0.75], [0., 0., 0., 0.75])],
                prescaled: false,
            },
            EventRecord {
                id: EventId {
                    run: 7,
                    lumi: 8,
                    event: 10,
                },
                retained: Vec::new(),
                prescaled: true,
            },
        ];
        let mut buffer = Vec::new();
        write_events(&mut buffer, &records, MassConvention::Nan).unwrap();
        let text = String::from_utf8(buffer).unwrap();
        let lines = text.lines().collect::<Vec<_>>();
        assert_eq!(
            lines,
            vec![
                "event 7 8 9 1",
                "pair 0.1 -0.2 3.5 1.25 1 0 0 0 0 0.75 1 0 0 0 0.75 0 0 0 1.5 1.5",
                "event 7 8 10 0",
            ]
        );
    }

    #[test]
    fn kept_pairs_read_back() {
        let events = parse_events(EVENTS).unwrap();
        let results = mass_filter(0.).filter_batch(&events);
        let reread = parse_events(&write_to_string(&results)).unwrap();

        let kept = results.records();
        assert_eq!(reread.len(), kept.len());
        for (event, record) in reread.iter().zip(kept) {
            assert_eq!(event.id, record.id);
            let pairs = event.pairs().unwrap();
            assert_eq!(pairs.len(), record.retained.len());
            for (read, written) in pairs.iter().zip(&record.retained) {
                assert_eq!(read.vertex, written.vertex);
                assert_eq!(read.vertex_chi2, written.vertex_chi2);
                assert_eq!(read.vertex_ndof, written.vertex_ndof);
                assert_eq!(read.daughter(0), written.daughter(0));
                assert_eq!(read.daughter(1), written.daughter(1));
            }
        }
    }

    #[test]
    fn chained_filters_match_direct_filtering() {
        const NEUTRON_MASS: Float = 0.939565;
        let events = parse_events(EVENTS).unwrap();

        // Invariant mass skim first, then missing mass on its output
        let r_results = mass_filter(0.).filter_batch(&events);
        let chained_input = parse_events(&write_to_string(&r_results)).unwrap();
        let chained = mass_filter(NEUTRON_MASS).filter_batch(&chained_input);

        let direct = mass_filter(NEUTRON_MASS).filter_batch(&events);
        assert_eq!(r_results.records().len(), 2);
        assert_eq!(chained.records(), direct.records());
    }
}
