//! certlint: Command-line compliance linter for X.509 code-signing certificates.

use anyhow::{Context, Result};
use certlint_lib::{
    compute_fingerprint, lint_descriptions, lint_schema, write_lint_descriptions, Certificate,
    DigestAlgorithm, InputFormat, LintContext, LintFilter, LintSource, Linter, LinterConfig,
    Registry, ResultSet, Status, TimeoutVerifier, TrustStore, TrustStoreVerifier,
};
use clap::{Args, Parser, Subcommand};
use rayon::prelude::*;
use serde::Serialize;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

/// Maximum size of a single input file or of stdin.
const MAX_INPUT_BYTES: u64 = 10 * 1024 * 1024;

/// Environment variable holding the log filter directive.
const LOG_ENV: &str = "CERTLINT_LOG";

#[derive(Parser)]
#[command(
    name = "certlint",
    version,
    about = "Lint X.509 code-signing certificates against CA/B Forum and RFC requirements",
    long_about = "certlint evaluates X.509 certificates against an effective-dated catalog\n\
                  of compliance rules for code-signing certificates. Every rule reports\n\
                  a status: NA, NE, pass, info, warn, error or fatal.\n\n\
                  Input format (PEM, DER or bare base64) is auto-detected unless\n\
                  --format is given. Reads from stdin when no file is given.\n\
                  Set CERTLINT_LOG (e.g. CERTLINT_LOG=debug) to see diagnostics.",
    after_help = "EXAMPLES:\n\
                  \n  certlint lint cert.pem\
                  \n  certlint lint --pretty cert.der\
                  \n  certlint lint -r --failures-only ./certs\
                  \n  certlint lint --CAfile root.pem --untrusted int.pem leaf.pem\
                  \n  certlint list --json\
                  \n  cat cert.pem | certlint lint"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Lint certificates (exit 0 = no error/fatal verdicts, 1 otherwise)
    #[command(after_help = "Each certificate produces one JSON object on stdout with the\n\
                      input file, its SHA-256 fingerprint and the verdict of every rule.\n\
                      PEM bundles produce one object per certificate.\n\
                      \nSOURCE VALUES:\n\
                      \n  br        CA/Browser Forum Baseline Requirements\
                      \n  mrfcsc    Minimum Requirements for Code Signing Certificates\
                      \n  rfc5280   RFC 5280\
                      \n\nEXAMPLES:\n\
                      \n  certlint lint cert.pem\
                      \n  certlint lint --include e_sub_cert_aia_missing cert.pem\
                      \n  certlint lint --exclude-source rfc5280 cert.pem\
                      \n  certlint lint --CApath /etc/ssl/certs --chain-timeout 5s cert.pem\
                      \n  certlint lint -r --threads 4 ./certs")]
    Lint(LintArgs),
    /// List the registered rules
    #[command(after_help = "EXAMPLES:\n\
                      \n  certlint list\
                      \n  certlint list --json\
                      \n  certlint list --schema")]
    List {
        /// One JSON object per rule, one per line
        #[arg(long, conflicts_with = "schema")]
        json: bool,
        /// A schema declaration with one boolean field per rule
        #[arg(long)]
        schema: bool,
    },
}

#[derive(Args)]
struct LintArgs {
    /// Certificate files or directories. Reads from stdin if omitted.
    files: Vec<PathBuf>,
    /// Input format: auto, pem, der or base64
    #[arg(long, default_value = "auto", value_name = "FORMAT")]
    format: InputFormat,
    /// Only run these rules (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', value_name = "LINT")]
    include: Vec<String>,
    /// Skip these rules (comma-separated or repeated)
    #[arg(long, value_delimiter = ',', value_name = "LINT")]
    exclude: Vec<String>,
    /// Only run rules from these sources
    #[arg(long, value_delimiter = ',', value_name = "SOURCE")]
    include_source: Vec<LintSource>,
    /// Skip rules from these sources
    #[arg(long, value_delimiter = ',', value_name = "SOURCE")]
    exclude_source: Vec<LintSource>,
    /// Worker threads for linting (default: available parallelism)
    #[arg(long, value_name = "N")]
    threads: Option<usize>,
    /// Upper bound on each chain verification (e.g. 10, 10s, 1m)
    #[arg(long, default_value = "10s", value_name = "DURATION")]
    chain_timeout: String,
    /// PEM file containing trusted CA certificates
    #[arg(long = "CAfile", visible_alias = "ca-file", value_name = "FILE")]
    ca_file: Option<PathBuf>,
    /// Directory of trusted CA certificates in PEM format
    #[arg(long = "CApath", visible_alias = "ca-path", value_name = "DIR")]
    ca_path: Option<PathBuf>,
    /// Use the system trust store for chain verification
    #[arg(long)]
    system_roots: bool,
    /// PEM file with untrusted intermediate certificates
    #[arg(long, value_name = "FILE")]
    untrusted: Option<PathBuf>,
    /// Pretty-print each JSON object
    #[arg(long)]
    pretty: bool,
    /// Only print certificates with error or fatal verdicts, and only those verdicts
    #[arg(long)]
    failures_only: bool,
    /// Recurse into subdirectories
    #[arg(short, long)]
    recurse: bool,
}

impl LintArgs {
    fn filter(&self) -> LintFilter {
        LintFilter {
            include_names: self.include.clone(),
            exclude_names: self.exclude.clone(),
            include_sources: self.include_source.clone(),
            exclude_sources: self.exclude_source.clone(),
        }
    }

    fn wants_chain(&self) -> bool {
        self.ca_file.is_some() || self.ca_path.is_some() || self.system_roots
    }
}

/// The JSON object printed for one certificate.
#[derive(Serialize)]
struct Report<'a> {
    file: &'a str,
    /// Position within a multi-certificate bundle.
    #[serde(skip_serializing_if = "Option::is_none")]
    index: Option<usize>,
    fingerprint: String,
    results: ResultSet,
}

/// One decoded certificate and where it came from.
struct Loaded {
    label: String,
    index: Option<usize>,
    cert: Certificate,
}

/// Totals from a lint run.
#[derive(Debug, Default, PartialEq, Eq)]
struct Summary {
    certificates: usize,
    failing: usize,
    unreadable: usize,
}

impl Summary {
    fn success(&self) -> bool {
        self.failing == 0 && self.unreadable == 0
    }
}

fn read_input(file: Option<&Path>) -> Result<Vec<u8>> {
    match file {
        Some(path) => {
            let meta = std::fs::metadata(path)
                .with_context(|| format!("Failed to stat file: {}", path.display()))?;
            if meta.len() > MAX_INPUT_BYTES {
                anyhow::bail!(
                    "File too large ({} bytes, max {} bytes): {}",
                    meta.len(),
                    MAX_INPUT_BYTES,
                    path.display()
                );
            }
            std::fs::read(path).with_context(|| format!("Failed to read file: {}", path.display()))
        }
        None => {
            let mut buf = Vec::new();
            std::io::stdin()
                .take(MAX_INPUT_BYTES)
                .read_to_end(&mut buf)
                .context("Failed to read from stdin")?;
            Ok(buf)
        }
    }
}

/// Decode every certificate in a file (or stdin).
fn load_certificates(file: Option<&Path>, format: InputFormat) -> Result<Vec<Certificate>> {
    let input = read_input(file)?;
    let label = file.map_or_else(|| "stdin".to_string(), |p| p.display().to_string());
    format
        .parse_all(&input)
        .with_context(|| format!("Failed to parse certificate: {label}"))
}

/// Parse a duration string using humantime format.
///
/// Plain numbers (e.g. "30") default to seconds. Otherwise, standard
/// humantime units are accepted: `ms`, `s`, `m`, `h`, etc.
fn parse_duration(s: &str) -> Result<Duration> {
    if s.chars().all(|c| c.is_ascii_digit()) {
        let secs: u64 = s.parse().context("Invalid duration value")?;
        return Ok(Duration::from_secs(secs));
    }
    humantime::parse_duration(s).with_context(|| format!("Invalid duration: '{s}'"))
}

/// Check if a path has a certificate file extension.
fn is_cert_file(path: &Path) -> bool {
    matches!(
        path.extension().and_then(|e| e.to_str()),
        Some(ext) if ext.eq_ignore_ascii_case("pem") || ext.eq_ignore_ascii_case("der")
            || ext.eq_ignore_ascii_case("crt") || ext.eq_ignore_ascii_case("cer")
    )
}

/// Find all certificate files (.pem, .der, .crt, .cer) in a directory.
fn find_cert_files(dir: &Path, recurse: bool) -> Vec<PathBuf> {
    let walker = if recurse {
        walkdir::WalkDir::new(dir)
    } else {
        walkdir::WalkDir::new(dir).max_depth(1)
    };
    let mut files: Vec<PathBuf> = walker
        .into_iter()
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().is_file() && is_cert_file(e.path()))
        .map(|e| e.into_path())
        .collect();
    files.sort();
    files
}

/// Expand directories into the certificate files they contain. Plain file
/// arguments are kept whatever their extension.
fn expand_inputs(inputs: &[PathBuf], recurse: bool) -> Vec<PathBuf> {
    let mut files = Vec::new();
    for input in inputs {
        if input.is_dir() {
            let found = find_cert_files(input, recurse);
            debug!(dir = %input.display(), files = found.len(), "walked directory");
            files.extend(found);
        } else {
            files.push(input.clone());
        }
    }
    files
}

/// Build the rule context: a trust-store verifier bounded by the chain
/// timeout when trust material is configured, no verifier otherwise.
fn chain_context(args: &LintArgs) -> Result<LintContext> {
    if !args.wants_chain() {
        if args.untrusted.is_some() {
            anyhow::bail!("--untrusted requires --CAfile, --CApath or --system-roots");
        }
        return Ok(LintContext::default());
    }

    let mut store = if args.system_roots {
        TrustStore::system().context("Failed to load system trust store")?
    } else {
        TrustStore::new()
    };
    if let Some(path) = &args.ca_file {
        let data = read_input(Some(path.as_path()))?;
        store
            .add_pem_bundle(&data)
            .with_context(|| format!("Failed to load CA file: {}", path.display()))?;
    }
    if let Some(dir) = &args.ca_path {
        store
            .add_pem_directory(dir)
            .with_context(|| format!("Failed to load CA directory: {}", dir.display()))?;
    }
    if store.is_empty() {
        anyhow::bail!("No trusted certificates loaded");
    }
    info!(anchors = store.len(), "loaded trust store");

    let mut verifier = TrustStoreVerifier::new(store);
    if let Some(path) = &args.untrusted {
        let data = read_input(Some(path.as_path()))?;
        let added = verifier
            .add_untrusted_pem(&data)
            .with_context(|| format!("Failed to load untrusted certificates: {}", path.display()))?;
        debug!(intermediates = added, "loaded untrusted pool");
    }

    let timeout = parse_duration(&args.chain_timeout)?;
    Ok(LintContext::with_chain_verifier(TimeoutVerifier::new(
        verifier, timeout,
    )))
}

/// Lint every input and write one JSON object per certificate to `out`.
fn run_lint<W: Write>(args: &LintArgs, out: &mut W) -> Result<Summary> {
    // Fail on bad settings before touching any input.
    parse_duration(&args.chain_timeout)?;
    let ctx = chain_context(args)?;
    let registry = Registry::builtin(&ctx)?.filtered(&args.filter())?;
    let linter = Linter::new(
        registry,
        &LinterConfig {
            threads: args.threads,
        },
    )?;
    debug!(?linter, "linter ready");

    let mut summary = Summary::default();
    let mut loaded: Vec<Loaded> = Vec::new();

    if args.files.is_empty() {
        match load_certificates(None, args.format) {
            Ok(certs) => loaded.extend(label_certificates("-", certs)),
            Err(e) => {
                eprintln!("-: {e:#}");
                summary.unreadable += 1;
            }
        }
    } else {
        let files = expand_inputs(&args.files, args.recurse);
        let decoded: Vec<(String, Result<Vec<Certificate>>)> = files
            .par_iter()
            .map(|f| {
                let result = load_certificates(Some(f.as_path()), args.format);
                (f.display().to_string(), result)
            })
            .collect();
        for (label, result) in decoded {
            match result {
                Ok(certs) => loaded.extend(label_certificates(&label, certs)),
                Err(e) => {
                    eprintln!("{label}: {e:#}");
                    summary.unreadable += 1;
                }
            }
        }
    }

    let certs: Vec<Certificate> = loaded.iter().map(|l| l.cert.clone()).collect();
    let all_results = linter.lint_batch(&certs);

    for (entry, results) in loaded.iter().zip(all_results) {
        summary.certificates += 1;
        let failing = results.has_failures();
        if failing {
            summary.failing += 1;
        }
        if args.failures_only && !failing {
            continue;
        }
        let results = if args.failures_only {
            results.at_least(Status::Error)
        } else {
            results
        };
        let report = Report {
            file: &entry.label,
            index: entry.index,
            fingerprint: compute_fingerprint(&entry.cert.raw_der, DigestAlgorithm::Sha256),
            results,
        };
        if args.pretty {
            serde_json::to_writer_pretty(&mut *out, &report)?;
        } else {
            serde_json::to_writer(&mut *out, &report)?;
        }
        out.write_all(b"\n")?;
    }
    out.flush()?;
    Ok(summary)
}

fn label_certificates(label: &str, certs: Vec<Certificate>) -> Vec<Loaded> {
    let bundle = certs.len() > 1;
    certs
        .into_iter()
        .enumerate()
        .map(|(i, cert)| Loaded {
            label: label.to_string(),
            index: bundle.then_some(i),
            cert,
        })
        .collect()
}

fn run_list<W: Write>(json: bool, schema: bool, out: &mut W) -> Result<()> {
    let registry = Registry::builtin(&LintContext::default())?;
    if json {
        write_lint_descriptions(&registry, &mut *out)?;
    } else if schema {
        out.write_all(lint_schema(&registry).as_bytes())?;
    } else {
        for d in lint_descriptions(&registry)? {
            writeln!(out, "{}\t{}\t{}", d.name, d.source.as_str(), d.description)?;
        }
    }
    out.flush()?;
    Ok(())
}

fn init_logging() {
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging();

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    match &cli.command {
        Commands::Lint(args) => {
            let summary = run_lint(args, &mut out)?;
            info!(
                certificates = summary.certificates,
                failing = summary.failing,
                unreadable = summary.unreadable,
                "lint finished"
            );
            if !summary.success() {
                std::process::exit(1);
            }
        }
        Commands::List { json, schema } => run_list(*json, *schema, &mut out)?,
    }
    Ok(())
}
