/// Declares all environment variables used throughout `minversions` and its crates.
pub struct EnvVars;

impl EnvVars {
    /// Equivalent to the `--minversions` command-line argument. If set to a truthy value, every
    /// selected environment installs the minimum versions of the project's dependencies.
    pub const MINVERSIONS: &'static str = "MINVERSIONS";

    /// Equivalent to the `--config-file` command-line argument.
    pub const MINVERSIONS_CONFIG_FILE: &'static str = "MINVERSIONS_CONFIG_FILE";

    /// The Python interpreter used to create environments and to evaluate markers when no
    /// environment-specific interpreter is available.
    pub const MINVERSIONS_PYTHON: &'static str = "MINVERSIONS_PYTHON";

    /// Path to the built source distribution of the project under test.
    ///
    /// Read from an environment's `setenv` table first, then from the process environment.
    pub const TOX_PACKAGE: &'static str = "TOX_PACKAGE";

    /// Used to set the logging level, e.g. `RUST_LOG=minversions=debug`.
    pub const RUST_LOG: &'static str = "RUST_LOG";

    /// Set by a virtual environment's activation script.
    pub const VIRTUAL_ENV: &'static str = "VIRTUAL_ENV";

    /// Disables the pip version check when invoking pip.
    pub const PIP_DISABLE_PIP_VERSION_CHECK: &'static str = "PIP_DISABLE_PIP_VERSION_CHECK";
}
