//! # mgwgen - Mobile gateway pipeline graph generator
//!
//! This library derives the module graph of a mobile gateway packet
//! processing pipeline from a handful of workload parameters and writes it
//! as an LGF (LEMON graph format) file for CPU placement tools.
//!
//! ## Overview
//!
//! A generated graph contains
//!
//! - **Modules**: every processing unit, labelled in instantiation order and
//!   weighted by its kind
//! - **Arcs**: module pairs adjacent in at least one flow
//! - **Flows**: per user/bearer uplink and downlink module sequences
//! - **Conflicts**: module pairs of bearer-0 flows that must be placed on
//!   different CPUs so that replicas survive CPU failures
//!
//! ## Architecture
//!
//! - `pipeline`: module kinds and weights, flow builder, expander, conflict detection
//! - `lgf`: LGF writer, reader and consistency checks
//! - `topology`: conversion of live pipeline topology dumps
//! - `config`: workload parameters and generator configuration
//! - `config_loader`: configuration file loading and CLI overrides
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use mgwgen::{config::Params, pipeline};
//!
//! let params = Params { user_num: 4, bearer_num: 2, conflict_num: 1, ..Params::default() };
//! let graph = pipeline::expand(&params)?;
//!
//! print!("{}", graph.to_lgf());
//! graph.write_lgf("mgw.lgf")?;
//! # Ok::<(), color_eyre::Report>(())
//! ```
//!
//! ## Configuration Format
//!
//! ```yaml
//! params:
//!   user_num: 2
//!   bearer_num: 2
//!   bearer0_user: 1
//!   cpu_num: 5
//!   cpu_capacity: 25.0
//!   conflict_num: 0
//! output:
//!   path: "mgw.lgf"
//!   quiet: false
//! ```
//!
//! ## Error Handling
//!
//! Generation errors are typed ([`pipeline::GenerationError`]); file and
//! configuration handling reports through `color_eyre`.

pub mod config;
pub mod config_loader;
pub mod lgf;
pub mod pipeline;
pub mod topology;
