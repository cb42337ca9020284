//! Envlock - per-environment secret files, encrypted at rest.
//!
//! # Architecture
//!
//! ```text
//! src/
//! ├── cli/              # Command-line interface
//! │   ├── install       # Install an environment (default command)
//! │   ├── init          # Write config and provision the repository
//! │   ├── new           # Create an environment from the template
//! │   ├── list          # Enumerate environments
//! │   ├── diff          # Compare variables across environments
//! │   └── unlock/lock/export_key   # Encryption lifecycle
//! └── core/             # Core library components
//!     ├── pattern       # Naming pattern → glob + name matcher
//!     ├── environments  # Discovery, validation, creation
//!     ├── steps         # Idempotent provisioning steps
//!     ├── lifecycle     # Repository status and gated operations
//!     ├── git_crypt     # git-crypt subprocess wrapper
//!     ├── keys          # base64 key transport
//!     ├── envfile       # dotenv-style parsing for diff
//!     └── config        # .envlock.toml management
//! ```
//!
//! # Features
//!
//! - Pattern-addressed environment files (`env/.env.[name]`)
//! - Encryption at rest through git-crypt
//! - Idempotent, re-entrant repository provisioning
//! - Copy or symlink installation of the selected environment

pub mod cli;
pub mod core;
pub mod error;
