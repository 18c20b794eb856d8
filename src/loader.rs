//! High-level loading of a configuration file into a bound structure.
//!
//! Your starting point should probably be [`load_from_default_path`] or [`load_from_path`].
//! Both read the file, parse it as YAML and bind the requested type at the document
//! root, wrapping every failure with a [`miette`] context that says which step failed.

use std::{
    env::current_dir,
    fs,
    path::{Path, PathBuf},
    time::Instant,
};

use miette::{miette, Context, IntoDiagnostic, Result};
use tracing::{debug, trace};

use crate::{document::parse_yaml, traits::FromNode};


/// A bound configuration, together with the file it was loaded from.
#[derive(Debug, Clone)]
pub struct LoadedConfiguration<T> {
    /// This is the canonical file path the configuration was loaded from.
    pub file_path: PathBuf,

    pub configuration: T,
}


/// Returns the default configuration filepath, which is at
/// `{current directory}/data/configuration.yaml`.
pub fn default_configuration_file_path() -> Result<PathBuf> {
    let mut configuration_filepath = current_dir()
        .into_diagnostic()
        .wrap_err_with(|| miette!("Could not get the current directory."))?;
    configuration_filepath.push("data/configuration.yaml");

    if !configuration_filepath.exists() {
        return Err(miette!(
            "Could not find configuration.yaml in data directory ({}).",
            configuration_filepath.display()
        ));
    }

    Ok(configuration_filepath)
}


/// Load the configuration from a specific file path.
pub fn load_from_path<T, P>(configuration_file_path: P) -> Result<LoadedConfiguration<T>>
where
    T: FromNode,
    P: AsRef<Path>,
{
    let configuration_file_path = configuration_file_path.as_ref();
    let time_before_file_read = Instant::now();

    // Read the configuration file into memory.
    let configuration_string = fs::read_to_string(configuration_file_path)
        .into_diagnostic()
        .wrap_err_with(|| {
            miette!(
                "Could not read configuration file at {}.",
                configuration_file_path.display()
            )
        })?;

    trace!(
        "Reading the configuration file took {} milliseconds.",
        time_before_file_read.elapsed().as_secs_f64() * 1000f64
    );

    let time_before_bind = Instant::now();


    // Parse the string into a document tree and then bind it.
    let document = parse_yaml(&configuration_string)
        .wrap_err("Could not parse configuration file!")?;

    let file_path = dunce::canonicalize(configuration_file_path)
        .into_diagnostic()
        .wrap_err("Could not canonicalize configuration file path!")?;

    let configuration = document
        .bind::<T>()
        .wrap_err("Failed to bind configuration.")?;


    trace!(
        "Parsing and binding the configuration took {} milliseconds.",
        time_before_bind.elapsed().as_secs_f64() * 1000f64
    );
    debug!("Loaded configuration from {}.", file_path.display());

    Ok(LoadedConfiguration {
        file_path,
        configuration,
    })
}

/// Load the configuration from the default path (`./data/configuration.yaml`).
pub fn load_from_default_path<T: FromNode>() -> Result<LoadedConfiguration<T>> {
    load_from_path(
        default_configuration_file_path()
            .wrap_err_with(|| "Could not load configuration file at default path.")?,
    )
}
