use anyhow::Context;
use anyhow::Result;
use clap::Parser;
use divisor_search::config::SearchConfig;
use divisor_search::math::monomial_order::MonomialOrder;
use divisor_search::search::DivisorSearch;
use divisor_search::search::SearchOutcome;
use divisor_search::search::reference_target;
use tracing_subscriber::EnvFilter;

/// Search for exact divisors of P(x,y) = (x^2 + 2xy + y^2)(x^3 + y^3)^2 among
/// supports of one or more monomials.
#[derive(Debug, Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Seed for all random sources. Drawn at random if absent.
    #[arg(short, long)]
    seed: Option<u64>,

    /// Smallest number of monomials per candidate.
    #[arg(long, default_value_t = 1)]
    min_subset_size: usize,

    /// Largest number of monomials per candidate.
    #[arg(long, default_value_t = 2)]
    max_subset_size: usize,

    /// Evaluate candidates on the current thread only.
    #[arg(long)]
    sequential: bool,

    /// Monomial order used to pick leading terms: `lex` or `grevlex`.
    #[arg(long, default_value_t = MonomialOrder::Lex)]
    order: MonomialOrder,

    /// Print the divisors and the run report as JSON.
    #[arg(long)]
    json: bool,
}

impl Args {
    fn config(&self) -> SearchConfig {
        let config = SearchConfig::default()
            .with_subset_sizes(self.min_subset_size..=self.max_subset_size)
            .with_parallel(!self.sequential)
            .with_monomial_order(self.order);
        let config = match self.seed {
            Some(seed) => config.with_seed(seed),
            None => config,
        };

        config.with_env_overrides()
    }
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let target = reference_target().context("failed to build the target polynomial")?;
    let search = DivisorSearch::new(target, args.config()).context("invalid search")?;
    let outcome = search.run();

    match args.json {
        true => println!("{}", serde_json::to_string_pretty(&outcome)?),
        false => print!("{}", listing(&outcome)),
    }

    Ok(())
}

/// Every divisor, followed by one line per term holding its coefficient and
/// its exponent vector.
fn listing(outcome: &SearchOutcome) -> String {
    let mut listing = String::from("Divisors are (multiplicity of 1)\n\n");
    for divisor in &outcome.divisors {
        listing.push_str(&format!("{}\n", divisor.polynomial));
        for term in divisor.polynomial.terms() {
            listing.push_str(&format!("    {} {:?}\n", term.coefficient, term.exponents));
        }
    }
    listing
}
