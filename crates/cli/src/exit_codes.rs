//! CLI Exit Code Registry
//!
//! This is the single source of truth for all CLI exit codes.
//! Exit codes are part of the shell contract; scripts rely on them.
//!
//! | Code | Meaning                                            |
//! |------|----------------------------------------------------|
//! | 0    | Success                                            |
//! | 1    | General error (unspecified)                        |
//! | 2    | Usage error (bad args, value rejected by --strict) |
//! | 3    | I/O error (store directory, input/output files)    |
//! | 4    | Parse error (theme JSON that cannot be read)       |
//!
//! # Adding New Exit Codes
//!
//! 1. Add the constant
//! 2. Document what triggers it
//! 3. Update the table above
//! 4. Wire it into the relevant command's error handling

use tessera_store::StoreError;

/// Success - command completed without errors.
pub const EXIT_SUCCESS: u8 = 0;

/// General error - unspecified failure, such as output that cannot be
/// serialized.
/// Avoid using this; prefer a specific error code.
pub const EXIT_ERROR: u8 = 1;

/// Usage error - bad arguments, unknown preset, or a value that
/// fails schema validation under `--strict`.
pub const EXIT_USAGE: u8 = 2;

/// I/O error - store directory not writable, input file missing,
/// output file not writable.
pub const EXIT_IO: u8 = 3;

/// Parse error - imported theme document is not valid theme JSON.
pub const EXIT_PARSE: u8 = 4;

/// Map a store error to its exit code.
pub fn store_exit_code(err: &StoreError) -> u8 {
    match err {
        StoreError::Io(_) => EXIT_IO,
        StoreError::Parse(_) => EXIT_PARSE,
    }
}
