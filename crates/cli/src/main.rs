// Tessera CLI - inspect and edit the layered theme store from a shell

mod assign;
mod exit_codes;

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use tessera_config::{Setting, ThemePatch, ThemePreset, ThemeState, ToolSettings};
use tessera_store::{FileStorage, Layer, Role, StoreError, ThemeStore};

use exit_codes::{store_exit_code, EXIT_ERROR, EXIT_IO, EXIT_SUCCESS, EXIT_USAGE};

#[derive(Parser)]
#[command(name = "tessera")]
#[command(about = "Layered theme store: master config, merchant overrides, computed theme")]
#[command(long_version = long_version())]
#[command(version)]
#[command(subcommand_required = false)]
struct Cli {
    /// Directory holding the persisted store (default: settings, then config dir)
    #[arg(long, global = true, env = "TESSERA_STORE_DIR", value_name = "DIR")]
    store_dir: Option<PathBuf>,

    /// Name of the persisted store entry
    #[arg(long, global = true, value_name = "KEY")]
    store_key: Option<String>,

    /// More log output on stderr (-v info, -vv debug). RUST_LOG also works.
    #[arg(long, short = 'v', global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Print a theme layer
    #[command(after_help = "\
Examples:
  tessera show
  tessera show --layer override
  tessera show --layer master --json")]
    Show {
        /// Which layer to print
        #[arg(long, value_enum, default_value = "computed")]
        layer: ShowLayer,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Update theme keys, routed by role
    #[command(after_help = "\
Admin edits write the master config and clear the same keys in the merchant
override. Merchant edits write the override only.

Examples:
  tessera set primary=#1D4ED8 borderRadius=12
  tessera set buttonShape=pill --as merchant
  tessera set darkMode=true --strict")]
    Set {
        /// Assignments (values parse as number, true/false, or text)
        #[arg(required = true, value_name = "KEY=VALUE")]
        assignments: Vec<String>,

        /// Route as this role instead of the stored one
        #[arg(long = "as", value_enum, value_name = "ROLE")]
        role: Option<RoleArg>,

        /// Reject values that don't match the theme schema
        #[arg(long)]
        strict: bool,
    },

    /// Clear merchant override keys so the master value shows through
    #[command(after_help = "\
Examples:
  tessera unset primary
  tessera unset borderRadius buttonShape")]
    Unset {
        #[arg(required = true, value_name = "KEY")]
        keys: Vec<String>,
    },

    /// Print or set the editing role
    Role {
        /// New role (omit to print the current one)
        #[arg(value_enum)]
        role: Option<RoleArg>,
    },

    /// List built-in presets, or apply one
    #[command(after_help = "\
Examples:
  tessera preset
  tessera preset midnight
  tessera preset mono --as merchant")]
    Preset {
        /// Preset to apply (omit to list)
        name: Option<String>,

        /// Route as this role instead of the stored one
        #[arg(long = "as", value_enum, value_name = "ROLE")]
        role: Option<RoleArg>,
    },

    /// Print the computed theme as CSS custom properties
    #[command(after_help = "\
Examples:
  tessera css
  tessera css --selector '[data-theme=shop]' -o theme.css
  tessera css --json")]
    Css {
        /// Rule selector (default: settings, then :root)
        #[arg(long)]
        selector: Option<String>,

        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,

        /// Print the variables as a JSON object instead of CSS
        #[arg(long)]
        json: bool,
    },

    /// Export master, override, and computed theme as JSON
    Export {
        /// Output file (omit for stdout)
        #[arg(long, short = 'o')]
        output: Option<PathBuf>,
    },

    /// Merge a theme JSON file into a layer
    #[command(after_help = "\
The file is either a flat object of theme keys, or a document written by
`tessera export` (the section matching --layer is used). In an override
import, null means \"inherit from master\".

Examples:
  tessera import brand.json --layer master
  tessera import backup.json --layer override")]
    Import {
        /// Theme JSON file
        file: PathBuf,

        /// Target layer
        #[arg(long, value_enum)]
        layer: LayerArg,
    },

    /// Reset theme layers to defaults
    Reset {
        /// Only drop the merchant override
        #[arg(long)]
        override_only: bool,
    },

    /// Print the effective tool settings
    Config {
        /// Print only the settings file path
        #[arg(long)]
        path: bool,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum ShowLayer {
    Master,
    Override,
    Computed,
}

#[derive(Clone, Copy, ValueEnum)]
enum LayerArg {
    Master,
    Override,
}

#[derive(Clone, Copy, ValueEnum)]
enum RoleArg {
    Admin,
    Merchant,
}

impl From<RoleArg> for Role {
    fn from(arg: RoleArg) -> Self {
        match arg {
            RoleArg::Admin => Role::Admin,
            RoleArg::Merchant => Role::Merchant,
        }
    }
}

impl From<LayerArg> for Layer {
    fn from(arg: LayerArg) -> Self {
        match arg {
            LayerArg::Master => Layer::Master,
            LayerArg::Override => Layer::Override,
        }
    }
}

/// Settings file merged with command-line overrides
struct Context {
    settings: ToolSettings,
    store_dir: PathBuf,
    store_key: String,
}

impl Context {
    fn new(cli: &Cli) -> Result<Self, CliError> {
        let settings = ToolSettings::load();
        let store_dir = cli
            .store_dir
            .clone()
            .unwrap_or_else(|| settings.resolved_store_dir());
        let store_key = cli
            .store_key
            .clone()
            .unwrap_or_else(|| settings.storage_key.clone());
        FileStorage::check_key(&store_key).map_err(|e| {
            CliError::args(e.to_string()).with_hint("store keys are plain names, e.g. --store-key brand-b")
        })?;
        log::debug!("Store: {} ({store_key})", store_dir.display());
        Ok(Self { settings, store_dir, store_key })
    }

    fn open_store(&self) -> ThemeStore<FileStorage> {
        ThemeStore::hydrate_with_key(FileStorage::new(&self.store_dir), self.store_key.clone())
    }
}

fn long_version() -> &'static str {
    if cfg!(debug_assertions) {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   debug",
            "\ntarget:  ", env!("TARGET"),
            "\nexport_version: 1",
        )
    } else {
        concat!(
            env!("CARGO_PKG_VERSION"),
            " (", env!("GIT_COMMIT_HASH"), ")",
            "\nbuild:   release",
            "\ntarget:  ", env!("TARGET"),
            "\nexport_version: 1",
        )
    }
}

fn init_logging(verbose: u8) {
    let filter = match verbose {
        0 => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        1 => EnvFilter::new("info"),
        _ => EnvFilter::new("debug"),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .without_time()
        .try_init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let result = Context::new(&cli).and_then(|ctx| run(&ctx, cli.command));

    match result {
        Ok(()) => ExitCode::from(EXIT_SUCCESS),
        Err(CliError { code, message, hint }) => {
            if !message.is_empty() {
                eprintln!("error: {}", message);
            }
            if let Some(hint) = hint {
                eprintln!("hint:  {}", hint);
            }
            ExitCode::from(code)
        }
    }
}

fn run(ctx: &Context, command: Option<Commands>) -> Result<(), CliError> {
    match command {
        None => {
            // No subcommand = show help
            eprintln!("Usage: tessera <command> [options]");
            eprintln!("       tessera --help for more information");
            Ok(())
        }
        Some(Commands::Show { layer, json }) => cmd_show(ctx, layer, json),
        Some(Commands::Set { assignments, role, strict }) => cmd_set(ctx, &assignments, role, strict),
        Some(Commands::Unset { keys }) => cmd_unset(ctx, &keys),
        Some(Commands::Role { role }) => cmd_role(ctx, role),
        Some(Commands::Preset { name, role }) => cmd_preset(ctx, name, role),
        Some(Commands::Css { selector, output, json }) => cmd_css(ctx, selector, output, json),
        Some(Commands::Export { output }) => cmd_export(ctx, output),
        Some(Commands::Import { file, layer }) => cmd_import(ctx, &file, layer),
        Some(Commands::Reset { override_only }) => cmd_reset(ctx, override_only),
        Some(Commands::Config { path }) => cmd_config(ctx, path),
    }
}

#[derive(Debug)]
pub struct CliError {
    pub code: u8,
    pub message: String,
    pub hint: Option<String>,
}

impl CliError {
    pub fn args(msg: impl Into<String>) -> Self {
        Self { code: EXIT_USAGE, message: msg.into(), hint: None }
    }

    pub fn io(msg: impl Into<String>) -> Self {
        Self { code: EXIT_IO, message: msg.into(), hint: None }
    }

    /// Create error from a store error with the matching exit code.
    pub fn store(err: StoreError) -> Self {
        let code = store_exit_code(&err);
        let hint = match &err {
            StoreError::Io(_) => {
                Some("check that the store directory is writable (--store-dir or TESSERA_STORE_DIR)".to_string())
            }
            StoreError::Parse(_) => {
                Some("expected a JSON object of theme keys, or a `tessera export` document".to_string())
            }
        };
        Self { code, message: err.to_string(), hint }
    }

    /// Add a hint to an existing error.
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.hint = Some(hint.into());
        self
    }
}

// ============================================================================
// Output helpers
// ============================================================================

fn print_json<T: Serialize + ?Sized>(value: &T) -> Result<(), CliError> {
    let json = serde_json::to_string_pretty(value)
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    println!("{json}");
    Ok(())
}

/// Write to a file, or stdout when no path is given
fn write_output(output: Option<&Path>, contents: &str) -> Result<(), CliError> {
    match output {
        Some(path) => fs::write(path, contents)
            .map_err(|e| CliError::io(format!("{}: {e}", path.display()))),
        None => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            handle
                .write_all(contents.as_bytes())
                .map_err(|e| CliError::io(e.to_string()))
        }
    }
}

fn print_theme(theme: &ThemeState, overrides: Option<&ThemePatch>) {
    for (key, value) in theme.iter() {
        let marker = match overrides {
            Some(o) if o.value(key).is_some() => "  (override)",
            _ => "",
        };
        println!("{key:<20} {value}{marker}");
    }
}

/// Flush after a mutation so write failures reach the exit code
fn save(store: &mut ThemeStore<FileStorage>) -> Result<(), CliError> {
    store.flush().map_err(CliError::store)
}

/// Warn about schema mismatches, or reject them in strict mode
fn validate(patch: &ThemePatch, strict: bool) -> Result<(), CliError> {
    let warnings = assign::check_patch(patch);
    if warnings.is_empty() {
        return Ok(());
    }
    if strict {
        return Err(CliError::args(warnings.join("; "))
            .with_hint("fix the value, or drop --strict (validation.strict) to store it anyway"));
    }
    for warning in warnings {
        eprintln!("warning: {warning}");
    }
    Ok(())
}

// ============================================================================
// show
// ============================================================================

fn cmd_show(ctx: &Context, layer: ShowLayer, json: bool) -> Result<(), CliError> {
    let store = ctx.open_store();
    match layer {
        ShowLayer::Master if json => print_json(store.master_config()),
        ShowLayer::Master => {
            print_theme(store.master_config(), None);
            Ok(())
        }
        ShowLayer::Computed if json => print_json(store.computed_theme()),
        ShowLayer::Computed => {
            print_theme(store.computed_theme(), Some(store.merchant_override()));
            Ok(())
        }
        ShowLayer::Override if json => print_json(store.merchant_override()),
        ShowLayer::Override => {
            if store.merchant_override().is_empty() {
                eprintln!("(no merchant overrides)");
            }
            for (key, setting) in store.merchant_override().iter() {
                match setting {
                    Setting::Value(value) => println!("{key:<20} {value}"),
                    Setting::Inherit => println!("{key:<20} (inherit)"),
                }
            }
            Ok(())
        }
    }
}

// ============================================================================
// set / unset
// ============================================================================

fn cmd_set(
    ctx: &Context,
    assignments: &[String],
    role: Option<RoleArg>,
    strict: bool,
) -> Result<(), CliError> {
    let patch = assign::parse_assignments(assignments)
        .map_err(|e| CliError::args(e).with_hint("use KEY=VALUE, e.g. primary=#1D4ED8"))?;
    validate(&patch, strict || ctx.settings.strict_validation)?;

    let mut store = ctx.open_store();
    let role = role.map(Role::from).unwrap_or_else(|| store.role());
    let count = patch.len();
    store.update_theme_as(role, patch);
    save(&mut store)?;

    eprintln!("Updated {count} key(s) as {role}");
    Ok(())
}

fn cmd_unset(ctx: &Context, keys: &[String]) -> Result<(), CliError> {
    let patch = keys
        .iter()
        .fold(ThemePatch::new(), |patch, key| patch.inherit(key.trim()));

    let mut store = ctx.open_store();
    store.set_merchant_override(patch);
    save(&mut store)
}

// ============================================================================
// role
// ============================================================================

fn cmd_role(ctx: &Context, role: Option<RoleArg>) -> Result<(), CliError> {
    let mut store = ctx.open_store();
    match role {
        None => {
            println!("{}", store.role());
            Ok(())
        }
        Some(role) => {
            store.set_role(role.into());
            save(&mut store)
        }
    }
}

// ============================================================================
// preset
// ============================================================================

fn cmd_preset(ctx: &Context, name: Option<String>, role: Option<RoleArg>) -> Result<(), CliError> {
    let Some(name) = name else {
        for preset in ThemePreset::all() {
            println!("{:<10} {}", preset.name(), preset.description());
        }
        return Ok(());
    };

    let preset = ThemePreset::from_name(&name).ok_or_else(|| {
        let names: Vec<_> = ThemePreset::all().iter().map(|p| p.name()).collect();
        CliError::args(format!("unknown preset '{name}'"))
            .with_hint(format!("available presets: {}", names.join(", ")))
    })?;

    let mut store = ctx.open_store();
    match role {
        Some(role) => store.update_theme_as(role.into(), preset.patch()),
        None => store.apply_preset(preset),
    }
    save(&mut store)
}

// ============================================================================
// css / export
// ============================================================================

fn cmd_css(
    ctx: &Context,
    selector: Option<String>,
    output: Option<PathBuf>,
    json: bool,
) -> Result<(), CliError> {
    let store = ctx.open_store();
    let vars = store.style_variables();

    if json {
        return print_json(vars);
    }

    let selector = selector.unwrap_or_else(|| ctx.settings.css_selector.clone());
    write_output(output.as_deref(), &vars.to_css(&selector))
}

fn cmd_export(ctx: &Context, output: Option<PathBuf>) -> Result<(), CliError> {
    let store = ctx.open_store();
    let mut json = store
        .export_config()
        .to_json_pretty()
        .map_err(|e| CliError { code: EXIT_ERROR, message: e.to_string(), hint: None })?;
    json.push('\n');
    write_output(output.as_deref(), &json)
}

// ============================================================================
// import / reset
// ============================================================================

fn cmd_import(ctx: &Context, file: &Path, layer: LayerArg) -> Result<(), CliError> {
    let json = fs::read_to_string(file)
        .map_err(|e| CliError::io(format!("{}: {e}", file.display())))?;

    let mut store = ctx.open_store();
    store
        .import_layer(layer.into(), &json)
        .map_err(|e| CliError::store(e).with_hint(format!("{} was not imported", file.display())))?;
    save(&mut store)
}

fn cmd_reset(ctx: &Context, override_only: bool) -> Result<(), CliError> {
    let mut store = ctx.open_store();
    if override_only {
        store.clear_merchant_override();
    } else {
        store.reset_theme();
    }
    save(&mut store)
}

// ============================================================================
// config
// ============================================================================

#[derive(Serialize)]
struct EffectiveConfig<'a> {
    settings_file: PathBuf,
    store_file: PathBuf,
    settings: &'a ToolSettings,
}

fn cmd_config(ctx: &Context, path_only: bool) -> Result<(), CliError> {
    if path_only {
        println!("{}", ToolSettings::config_path().display());
        return Ok(());
    }
    print_json(&EffectiveConfig {
        settings_file: ToolSettings::config_path(),
        store_file: FileStorage::new(&ctx.store_dir)
            .path_for(&ctx.store_key)
            .map_err(|e| CliError::args(e.to_string()))?,
        settings: &ctx.settings,
    })
}
