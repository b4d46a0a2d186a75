//! Template Fallback CLI
//!
//! Usage:
//!   template-fallback [OPTIONS] <COMMAND>
//!
//! Commands:
//!   extract    List placeholder names (positional first, then named)
//!   fill       Fill a template with values, falling back to defaults
//!   describe   Print field labels for placeholder names
//!   fields     Print the input fields of a template
//!   table      Print the active fallback rules
//!   lint       Check a template for surprising placeholders
//!
//! Options:
//!   -r, --rules <FILE>  Rule book file replacing the built-in rules (TOML format)
//!   -h, --help          Print help

use std::fs;
use std::io::{self, IsTerminal, Read};
use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use env_logger::Env;
use log::debug;

use template_fallback::{
    extract_placeholder_names, lint, parse_mapping_entry, Error, InputMap, Resolver, RuleBook,
    TemplateCatalog,
};

#[derive(Parser)]
#[command(name = "template-fallback")]
#[command(about = "Fill WhatsApp message template placeholders with readable defaults")]
struct Cli {
    /// Rule book file replacing the built-in fallback rules (TOML format)
    #[arg(short, long, global = true)]
    rules: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// List placeholder names, positional first then named
    Extract(TemplateArgs),

    /// Fill a template, falling back to defaults for blank values
    Fill {
        #[command(flatten)]
        template: TemplateArgs,

        /// Value for the next placeholder, in template order (repeatable)
        #[arg(short = 'v', long = "value")]
        values: Vec<String>,
    },

    /// Print the field label for each placeholder name
    Describe {
        /// Placeholder names
        #[arg(required = true)]
        names: Vec<String>,

        /// Input map entry (repeatable)
        #[arg(short, long = "map", value_name = "KEY=CATEGORY", value_parser = parse_mapping_entry)]
        map: Vec<(String, String)>,
    },

    /// Print one input field per placeholder occurrence
    Fields {
        #[command(flatten)]
        template: TemplateArgs,

        /// Print fields as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the active fallback rules in match order
    Table,

    /// Check a template for unclosed braces, repeats, gaps and unused mappings
    Lint {
        #[command(flatten)]
        template: TemplateArgs,

        /// Disable colored reports
        #[arg(long)]
        no_color: bool,
    },
}

#[derive(Args)]
struct TemplateArgs {
    /// Template file (reads from stdin if not provided)
    input: Option<PathBuf>,

    /// Template catalog file (TOML, or JSON with a .json extension)
    #[arg(short, long, requires = "template", conflicts_with = "input")]
    catalog: Option<PathBuf>,

    /// Template name within the catalog
    #[arg(short, long, requires = "catalog")]
    template: Option<String>,

    /// Input map entry, overriding the catalog's (repeatable)
    #[arg(short, long = "map", value_name = "KEY=CATEGORY", value_parser = parse_mapping_entry)]
    map: Vec<(String, String)>,
}

/// Template text plus everything needed to report on it
struct LoadedTemplate {
    body: String,
    origin: String,
    mapping: InputMap,
}

impl LoadedTemplate {
    fn mapping(&self) -> Option<&InputMap> {
        if self.mapping.is_empty() {
            None
        } else {
            Some(&self.mapping)
        }
    }
}

fn main() {
    env_logger::init_from_env(Env::default().default_filter_or("warn"));

    let cli = Cli::parse();

    let Some(command) = &cli.command else {
        print_intro();
        return;
    };

    // Load rule book
    let custom;
    let rules = match &cli.rules {
        Some(path) => match RuleBook::from_file(path) {
            Ok(book) => {
                custom = book;
                &custom
            }
            Err(e) => {
                eprintln!("Error loading rule book '{}': {}", path.display(), e);
                std::process::exit(1);
            }
        },
        None => RuleBook::builtin(),
    };

    match run(command, &Resolver::new(rules)) {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

/// Execute a command; `Ok(false)` means the command found problems
fn run(command: &Command, resolver: &Resolver<'_>) -> Result<bool, Error> {
    match command {
        Command::Extract(args) => {
            let template = load_template(args)?;
            for name in extract_placeholder_names(&template.body) {
                println!("{}", name);
            }
        }
        Command::Fill { template, values } => {
            let template = load_template(template)?;
            println!(
                "{}",
                resolver.substitute(&template.body, values, template.mapping())
            );
        }
        Command::Describe { names, map } => {
            let mapping: InputMap = map.iter().cloned().collect();
            let mapping = (!mapping.is_empty()).then_some(&mapping);
            for name in names {
                println!("{}: {}", name, resolver.describe(name, mapping));
            }
        }
        Command::Fields { template, json } => {
            let template = load_template(template)?;
            let fields = resolver.form_fields(&template.body, template.mapping());
            if *json {
                println!("{}", serde_json::to_string_pretty(&fields)?);
            } else {
                for field in fields {
                    println!(
                        "{}\t{}\t{}\t{}",
                        field.index, field.token, field.label, field.fallback
                    );
                }
            }
        }
        Command::Table => {
            let rules = resolver.rules();
            if let Some(name) = &rules.name {
                println!("# {}", name);
            }
            for (index, rule) in rules.rules().iter().enumerate() {
                println!(
                    "{:>2}. {} -> {} ({})",
                    index + 1,
                    rule.keywords().join("|"),
                    rule.fallback_value,
                    rule.description
                );
            }
        }
        Command::Lint { template, no_color } => {
            let template = load_template(template)?;
            let warnings = lint::check(&template.body, template.mapping(), resolver.rules());
            let color = !no_color && io::stderr().is_terminal();
            for warning in &warnings {
                eprint!("{}", warning.report(&template.body, &template.origin, color));
            }
            debug!("{} lint warning(s) for {}", warnings.len(), template.origin);
            return Ok(warnings.is_empty());
        }
    }
    Ok(true)
}

fn load_template(args: &TemplateArgs) -> Result<LoadedTemplate, Error> {
    let overrides = args.map.iter().cloned();

    if let (Some(path), Some(name)) = (&args.catalog, &args.template) {
        let catalog = TemplateCatalog::from_file(path)?;
        let template = catalog.get(name)?;
        let mut mapping = template.input_map.clone();
        mapping.extend(overrides);
        return Ok(LoadedTemplate {
            body: template.body.clone(),
            origin: template.name.clone(),
            mapping,
        });
    }

    let (body, origin) = match &args.input {
        Some(path) => {
            let body =
                fs::read_to_string(path).map_err(|e| Error::input(Some(path.clone()), e))?;
            (body, path.display().to_string())
        }
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .map_err(|e| Error::input(None, e))?;
            (buffer, "<stdin>".to_string())
        }
    };

    // Template files usually end with a newline that is not part of the message
    let body = body.strip_suffix('\n').unwrap_or(&body).to_string();

    Ok(LoadedTemplate {
        body,
        origin,
        mapping: overrides.collect(),
    })
}

fn print_intro() {
    println!(
        r#"Template Fallback - fill WhatsApp template placeholders with readable defaults

USAGE:
    template-fallback [OPTIONS] <COMMAND>
    echo 'Hi {{{{name}}}}' | template-fallback fill -v John

COMMANDS:
    extract     List placeholder names
    fill        Fill a template (-v VALUE per placeholder, in order)
    describe    Print field labels for placeholder names
    fields      Print input fields (--json for JSON)
    table       Print the active fallback rules
    lint        Check a template for surprising placeholders

OPTIONS:
    -r, --rules <FILE>      Replacement fallback rules (TOML)
    -c, --catalog <FILE>    Template catalog (TOML or JSON)
    -t, --template <NAME>   Template within the catalog
    -m, --map KEY=CATEGORY  Input map entry, e.g. -m 1=customer_name
    -h, --help              Print help

Blank values fall back to defaults: {{{{1}}}} -> Customer, {{{{amount}}}} -> Amount,
anything unrecognized -> Value."#
    );
}
