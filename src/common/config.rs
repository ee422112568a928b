//! Global configuration, built from the command line at startup.

use ansi_term::{Colour, Style};
use clap::Arg;

/// Clap `App` with static lifetimes.
pub type App = ::clap::App<'static, 'static>;
/// Clap `ArgMatches` with static lifetime.
pub type Matches = ::clap::ArgMatches<'static>;

/// Functions all sub-configurations must have.
pub trait SubConf {
    /// Adds its options to a clap app.
    fn add_args(app: App) -> App;
    /// Creates itself from some matches.
    fn new(matches: &Matches) -> Self;
}

/// Learning algorithm selected by the user.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Alg {
    /// Plain Horndini: emit the maximal conjunction.
    Horndini,
    /// Sorcar adding all relevant predicates.
    SorcarAll,
    /// Sorcar adding the first relevant predicate.
    SorcarFirst,
    /// Sorcar with greedy hitting-set selection.
    SorcarGreedy,
    /// Sorcar with cardinality-minimal selection through the solver.
    SorcarMinimal,
    /// Winnow threshold learner.
    Winnow,
    /// Perceptron threshold learner.
    Perceptron,
}
impl Alg {
    /// Parses an algorithm name.
    pub fn of_str(s: &str) -> Option<Self> {
        match s {
            "horndini" => Some(Alg::Horndini),
            "sorcar" => Some(Alg::SorcarAll),
            "sorcar-first" => Some(Alg::SorcarFirst),
            "sorcar-greedy" => Some(Alg::SorcarGreedy),
            "sorcar-minimal" => Some(Alg::SorcarMinimal),
            "winnow" => Some(Alg::Winnow),
            "perceptron" => Some(Alg::Perceptron),
            _ => None,
        }
    }
    /// Name of the algorithm.
    pub fn as_str(self) -> &'static str {
        match self {
            Alg::Horndini => "horndini",
            Alg::SorcarAll => "sorcar",
            Alg::SorcarFirst => "sorcar-first",
            Alg::SorcarGreedy => "sorcar-greedy",
            Alg::SorcarMinimal => "sorcar-minimal",
            Alg::Winnow => "winnow",
            Alg::Perceptron => "perceptron",
        }
    }
}

/// Solver configuration.
pub struct SmtConf {
    /// Command used to call z3.
    pub z3_cmd: String,
}
impl SmtConf {
    /// Actual `rsmt2` solver configuration.
    pub fn conf(&self) -> ::rsmt2::SmtConf {
        ::rsmt2::SmtConf::z3(self.z3_cmd.as_str())
    }
}
impl SubConf for SmtConf {
    fn add_args(app: App) -> App {
        app.arg(
            Arg::with_name("z3_cmd")
                .long("--z3")
                .help("sets the command used to call z3")
                .default_value("z3")
                .takes_value(true),
        )
    }

    fn new(matches: &Matches) -> Self {
        let z3_cmd = matches
            .value_of("z3_cmd")
            .expect("unreachable(z3_cmd): default is provided")
            .to_string();
        SmtConf { z3_cmd }
    }
}

/// Learner configuration.
pub struct LearnConf {
    /// Algorithm to run.
    pub alg: Alg,
    /// Reset `R` to the empty set at the start of the round.
    pub reset_r: bool,
    /// Emit Horndini's result in the first round instead of reducing.
    pub horndini_first: bool,
    /// Alternate Horndini (odd rounds) and Sorcar (even rounds).
    pub alternate: bool,
    /// Read the prior round's weights instead of reinitializing.
    pub read_weights: bool,
    /// Winnow proposes the constant-false hypothesis in the first round.
    pub false_first: bool,
    /// Impute labels of implication examples from Sorcar's `R` instead of
    /// Horndini's `X`.
    pub sorcar_labels: bool,
    /// Epoch cap for the threshold learners.
    pub max_epochs: usize,
}
impl SubConf for LearnConf {
    fn add_args(app: App) -> App {
        app.arg(
            Arg::with_name("algo")
                .short("-a")
                .long("--algo")
                .help(
                    "selects the learning algorithm: horndini | sorcar | sorcar-first \
                     | sorcar-greedy | sorcar-minimal | winnow | perceptron",
                )
                .validator(alg_validator)
                .value_name("ALGO")
                .default_value("sorcar")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("reset_r")
                .short("-r")
                .long("--reset_r")
                .help("resets R to the empty set at the start of the round"),
        )
        .arg(
            Arg::with_name("horndini_first")
                .short("-f")
                .long("--horndini_first")
                .help("emits Horndini's conjunctions in the first round, skipping Sorcar"),
        )
        .arg(
            Arg::with_name("alternate")
                .short("-t")
                .long("--alternate")
                .help("alternates Horndini (odd rounds) and Sorcar (even rounds)"),
        )
        .arg(
            Arg::with_name("read_weights")
                .short("-w")
                .long("--read_weights")
                .help("reads the prior round's weights instead of reinitializing them"),
        )
        .arg(
            Arg::with_name("false_first")
                .short("-n")
                .long("--false_first")
                .help("makes Winnow propose the constant-false hypothesis in the first round"),
        )
        .arg(
            Arg::with_name("sorcar_labels")
                .short("-s")
                .long("--sorcar_labels")
                .help("labels implication examples from Sorcar's R instead of Horndini's X"),
        )
        .arg(
            Arg::with_name("max_epochs")
                .long("--max_epochs")
                .help("epoch cap for the threshold learners")
                .validator(int_validator)
                .value_name("INT")
                .default_value("10000")
                .takes_value(true)
                .hidden(true),
        )
    }

    fn new(matches: &Matches) -> Self {
        let alg = matches
            .value_of("algo")
            .and_then(Alg::of_str)
            .expect("unreachable(algo): default is provided and input validated in clap");
        LearnConf {
            alg,
            reset_r: matches.is_present("reset_r"),
            horndini_first: matches.is_present("horndini_first"),
            alternate: matches.is_present("alternate"),
            read_weights: matches.is_present("read_weights"),
            false_first: matches.is_present("false_first"),
            sorcar_labels: matches.is_present("sorcar_labels"),
            max_epochs: int_of_matches(matches, "max_epochs"),
        }
    }
}
impl ::std::fmt::Display for LearnConf {
    fn fmt(&self, fmt: &mut ::std::fmt::Formatter) -> ::std::fmt::Result {
        write!(
            fmt,
            "reset-R={} first={} alternate={} weights={} false-first={} sorcar-labels={}",
            self.reset_r,
            self.horndini_first,
            self.alternate,
            self.read_weights,
            self.false_first,
            self.sorcar_labels
        )
    }
}

/// Output mode for the threshold learners' hypothesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LtfMode {
    /// Emit the threshold function itself.
    Ltf,
    /// Emit the Boolean lowering.
    Bool,
    /// Emit the lowering when small enough, the threshold function otherwise.
    Adaptive,
}

/// Threshold-function output configuration.
pub struct LtfConf {
    /// Output mode.
    pub mode: LtfMode,
    /// Leaf-count threshold of the adaptive mode.
    pub threshold: usize,
}
impl SubConf for LtfConf {
    fn add_args(app: App) -> App {
        app.arg(
            Arg::with_name("ltf_mode")
                .short("-l")
                .long("--ltf")
                .help("LTF output mode: 1 = LTF only, 2 = Boolean only, otherwise adaptive")
                .validator(int_validator)
                .value_name("INT")
                .default_value("0")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("ltf_threshold")
                .short("-j")
                .long("--ltf_threshold")
                .help("leaf-count threshold above which the adaptive mode emits the LTF")
                .validator(int_validator)
                .value_name("INT")
                .default_value("4")
                .takes_value(true),
        )
    }

    fn new(matches: &Matches) -> Self {
        let mode = match int_of_matches(matches, "ltf_mode") {
            1 => LtfMode::Ltf,
            2 => LtfMode::Bool,
            _ => LtfMode::Adaptive,
        };
        LtfConf {
            mode,
            threshold: int_of_matches(matches, "ltf_threshold"),
        }
    }
}

/// Global configuration.
pub struct Config {
    /// File stem of the round's artifacts.
    stem: Option<String>,
    /// Verbosity.
    pub verb: Verb,
    /// Styles, for coloring.
    styles: Styles,
    /// Learner configuration.
    pub learn: LearnConf,
    /// Solver configuration.
    pub solver: SmtConf,
    /// Threshold-function output configuration.
    pub ltf: LtfConf,
}
impl ColorExt for Config {
    fn styles(&self) -> &Styles {
        &self.styles
    }
}
impl Config {
    /// File stem of the round's artifacts.
    pub fn stem(&self) -> Option<&String> {
        self.stem.as_ref()
    }
    /// True iff verbose or debug.
    pub fn verbose(&self) -> bool {
        self.verb.verbose()
    }
    /// True iff debug.
    pub fn debug(&self) -> bool {
        self.verb.debug()
    }

    /// Parses command-line arguments and generates the configuration.
    pub fn clap() -> Self {
        let mut app = App::new(crate_name!())
            .version(crate_version!())
            .about("Conjunctive Horn-constraint learner for CEGIS-style invariant inference.");
        app = Self::add_args(app);
        app = LearnConf::add_args(app);
        app = SmtConf::add_args(app);
        app = LtfConf::add_args(app);

        let matches = app.get_matches();

        let stem = matches.value_of("file_stem").map(|s| s.to_string());

        let mut verb = Verb::default();
        for _ in 0..matches.occurrences_of("verb") {
            verb.inc()
        }
        for _ in 0..matches.occurrences_of("quiet") {
            verb.dec()
        }

        let color = bool_of_matches(&matches, "color");
        let styles = Styles::new(color);

        let learn = LearnConf::new(&matches);
        let solver = SmtConf::new(&matches);
        let ltf = LtfConf::new(&matches);

        Config {
            stem,
            verb,
            styles,
            learn,
            solver,
            ltf,
        }
    }

    /// Adds the top-level clap options.
    pub fn add_args(app: App) -> App {
        app.arg(
            Arg::with_name("file_stem")
                .help("sets the file stem shared by the round's artifacts")
                .index(1),
        )
        .arg(
            Arg::with_name("verb")
                .short("-v")
                .help("verbose output")
                .takes_value(false)
                .multiple(true),
        )
        .arg(
            Arg::with_name("quiet")
                .short("-q")
                .help("quiet output")
                .takes_value(false)
                .multiple(true),
        )
        .arg(
            Arg::with_name("color")
                .long("--color")
                .short("-c")
                .help("(de)activates coloring")
                .validator(bool_validator)
                .value_name(bool_format)
                .default_value("on")
                .takes_value(true),
        )
    }
}

/// Verbosity level.
#[derive(PartialEq, Eq, Debug)]
pub enum Verb {
    /// Quiet.
    Quiet,
    /// Verbose.
    Verb,
    /// Debug.
    Debug,
}
impl Default for Verb {
    fn default() -> Self {
        Verb::Quiet
    }
}
impl Verb {
    /// Increments verbosity.
    pub fn inc(&mut self) {
        match *self {
            Verb::Quiet => *self = Verb::Verb,
            Verb::Verb => *self = Verb::Debug,
            _ => (),
        }
    }
    /// Decrements verbosity.
    pub fn dec(&mut self) {
        match *self {
            Verb::Debug => *self = Verb::Verb,
            Verb::Verb => *self = Verb::Quiet,
            _ => (),
        }
    }
    /// True iff verbose or debug.
    pub fn verbose(&self) -> bool {
        *self != Verb::Quiet
    }
    /// True iff debug.
    pub fn debug(&self) -> bool {
        *self == Verb::Debug
    }
}

/// Contains some styles for coloring.
#[derive(Debug, Clone)]
pub struct Styles {
    /// Emphasis style.
    emph: Style,
    /// Happy style.
    hap: Style,
    /// Sad style.
    sad: Style,
    /// Bad style.
    bad: Style,
}
impl Default for Styles {
    fn default() -> Self {
        Styles::new(true)
    }
}
impl ColorExt for Styles {
    fn styles(&self) -> &Styles {
        self
    }
}
impl Styles {
    /// Creates some styles.
    pub fn new(colored: bool) -> Self {
        Styles {
            emph: if colored {
                Style::new().bold()
            } else {
                Style::new()
            },
            hap: if colored {
                Colour::Green.normal().bold()
            } else {
                Style::new()
            },
            sad: if colored {
                Colour::Yellow.normal().bold()
            } else {
                Style::new()
            },
            bad: if colored {
                Colour::Red.normal().bold()
            } else {
                Style::new()
            },
        }
    }
}

/// Can color things.
pub trait ColorExt {
    /// The styles in the colorizer: emph, happy, sad, and bad.
    #[inline]
    fn styles(&self) -> &Styles;
    /// String emphasis.
    #[inline]
    fn emph<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().emph.paint(s.as_ref()))
    }
    /// Happy string.
    #[inline]
    fn happy<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().hap.paint(s.as_ref()))
    }
    /// Sad string.
    #[inline]
    fn sad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().sad.paint(s.as_ref()))
    }
    /// Bad string.
    #[inline]
    fn bad<S: AsRef<str>>(&self, s: S) -> String {
        format!("{}", self.styles().bad.paint(s.as_ref()))
    }
}

/// Format for booleans.
pub static bool_format: &str = "on|off";

/// Boolean of a string.
pub fn bool_of_str(s: &str) -> Option<bool> {
    match s {
        "on" | "true" => Some(true),
        "off" | "false" => Some(false),
        _ => None,
    }
}

/// Boolean of some matches.
///
/// Assumes a default is provided and the input has been validated with
/// `bool_validator`.
pub fn bool_of_matches(matches: &Matches, key: &str) -> bool {
    matches
        .value_of(key)
        .and_then(bool_of_str)
        .expect("failed to retrieve boolean argument")
}

/// Integer of some matches.
///
/// Assumes a default is provided and the input has been validated with
/// `int_validator`.
pub fn int_of_matches(matches: &Matches, key: &str) -> usize {
    use std::str::FromStr;
    matches
        .value_of(key)
        .map(usize::from_str)
        .expect("failed to retrieve integer argument")
        .expect("failed to retrieve integer argument")
}

/// Validates integer input.
pub fn int_validator(s: String) -> Result<(), String> {
    use std::str::FromStr;
    match usize::from_str(&s) {
        Ok(_) => Ok(()),
        Err(_) => Err(format!("expected an integer, got `{}`", s)),
    }
}

/// Validates boolean input.
pub fn bool_validator(s: String) -> Result<(), String> {
    if bool_of_str(&s).is_some() {
        Ok(())
    } else {
        Err(format!("expected `on/true` or `off/false`, got `{}`", s))
    }
}

/// Validates algorithm names.
pub fn alg_validator(s: String) -> Result<(), String> {
    if Alg::of_str(&s).is_some() {
        Ok(())
    } else {
        Err(format!("expected an algorithm name, got `{}`", s))
    }
}
