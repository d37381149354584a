//! Mechanism for loading and sharing the filter configuration

use crate::{momentum::MassConvention, numeric::Float, Result};

use eyre::{ensure, eyre, WrapErr};

use std::{fs, path::PathBuf, str::FromStr};

/// Filter configuration
#[derive(Clone, Debug, PartialEq)]
pub struct Configuration {
    /// File from which events are read
    pub input_file: PathBuf,

    /// File to which kept events are written
    pub output_file: PathBuf,

    /// Name of the upstream pair collection (for diagnostics)
    pub collection: String,

    /// Lower bound of the missing mass window, excluded (GeV)
    pub min_mass: Float,

    /// Upper bound of the missing mass window, excluded (GeV)
    pub max_mass: Float,

    /// Mass of the fixed target particle (GeV), 0 gives the invariant mass
    pub target_mass: Float,

    /// Keep one in this many events without selected pairs, 0 keeps none
    pub prescale_false: u32,

    /// How the mass of unphysical pair combinations is computed
    pub mass_convention: MassConvention,
}
//
impl Configuration {
    /// Load the configuration from a file, check it, and print it out
    pub fn load(file_name: &str) -> Result<Self> {
        // Read out the filter's configuration file or die trying.
        let config_str = fs::read_to_string(file_name)
            .wrap_err_with(|| format!("Could not read configuration file {}", file_name))?;
        let config = Self::parse(&config_str)?;

        // Display it so that the run log records what was used
        config.print();
        Ok(config)
    }

    /// Parse and check the contents of a configuration file
    pub fn parse(config_str: &str) -> Result<Self> {
        // We will iterate over the configuration items. These should be the
        // first non-whitespace chunk of text on each line, whatever follows is
        // a comment. We will ignore blank lines.
        let mut config_iter = config_str
            .lines()
            .filter_map(|line| line.split_whitespace().next());

        // This closure fetches the next configuration item, tagging it with
        // the name of the configuration field which it is supposed to fill to
        // ease error reporting, and handling unexpected end-of-file too.
        let mut next_item = |name: &'static str| -> Result<ConfigItem> {
            config_iter
                .next()
                .map(|data| ConfigItem::new(name, data))
                .ok_or_else(|| eyre!("Missing configuration of {}", name))
        };

        // Decode the configuration items into concrete values
        let config = Configuration {
            input_file: next_item("input_file")?.parse::<PathBuf>()?,
            output_file: next_item("output_file")?.parse::<PathBuf>()?,
            collection: next_item("collection")?.parse::<String>()?,
            min_mass: next_item("min_mass")?.parse::<Float>()?,
            max_mass: next_item("max_mass")?.parse::<Float>()?,
            target_mass: next_item("target_mass")?.parse::<Float>()?,
            prescale_false: next_item("prescale_false")?.parse::<u32>()?,
            mass_convention: next_item("mass_convention")?.parse::<MassConvention>()?,
        };

        // An empty or NaN window would silently reject every pair
        ensure!(
            config.min_mass < config.max_mass,
            "Mass window [{}, {}] is empty",
            config.min_mass,
            config.max_mass
        );

        // The target is a real particle at rest
        ensure!(
            config.target_mass.is_finite() && config.target_mass >= 0.,
            "Target mass must be finite and non-negative, got {}",
            config.target_mass
        );

        Ok(config)
    }

    /// Display the configuration
    pub fn print(&self) {
        println!("INPUT          : {}", self.input_file.display());
        println!("OUTPUT         : {}", self.output_file.display());
        println!("COLLECTION     : {}", self.collection);
        println!("MINMASS        : {}", self.min_mass);
        println!("MAXMASS        : {}", self.max_mass);
        println!("TARGETMASS     : {}", self.target_mass);
        println!("PRESCALEFALSE  : {}", self.prescale_false);
        println!("MASSCONVENTION : {}", self.mass_convention.name());
    }
}

/// A value from the configuration file, tagged with the struct field which it
/// is supposed to map for error reporting purposes.
struct ConfigItem<'data> {
    name: &'static str,
    data: &'data str,
}
//
impl<'data> ConfigItem<'data> {
    /// Build a config item from a struct field tag and raw iterator data
    fn new(name: &'static str, data: &'data str) -> Self {
        Self { name, data }
    }

    /// Parse this data using Rust's standard parsing logic
    fn parse<T: FromStr>(self) -> Result<T>
    where
        <T as FromStr>::Err: Into<eyre::Report>,
    {
        self.data
            .parse::<T>()
            .map_err(Into::<eyre::Report>::into)
            .wrap_err_with(|| format!("Could not parse configuration of {}", self.name))
    }
}
