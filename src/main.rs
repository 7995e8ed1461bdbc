use ll1_afd_helper::lexer::{extract_expressions, tokenize, Token};
use ll1_afd_helper::log::{Logger, PrintLog};
use ll1_afd_helper::{Analysis, Grammar};
use serde::Serialize;
use std::{fs, io::Read, process};

const OUTPUTS: [&str; 7] = ["prod", "ff", "ll1", "afd", "tokens", "validate", "predict"];

fn print_help() {
    println!("Usage: ll1-afd-helper [actions] outputs [options] [grammar file]");
    println!("actions:");
    println!("  elf: Show productions after eliminating left recursion");
    println!("outputs:");
    println!("  prod: Productions");
    println!("  ff: First and follow");
    println!("  ll1: LL(1) parsing table");
    println!("  afd: Automaton derived from the LL(1) table");
    println!("  tokens: Tokens of the source text");
    println!("  validate: Run each expression of the source text through the automaton");
    println!("  predict: Run each expression of the source text through the LL(1) parser");
    println!("options:");
    println!("  -h: Print this help");
    println!("  -l: Print in LaTeX format");
    println!("  -j: Print in JSON format");
    println!("  -s <file>: Source text (default: stdin)");
    println!("  -t <a,b,...>: Declared terminals; other undefined symbols are errors");
    println!("Without a grammar file the arithmetic grammar is used:");
    print!("{}", Grammar::arithmetic());
}

enum OutputFormat {
    Plain,
    LaTeX,
    JSON,
}

#[derive(Serialize)]
struct ExpressionOutput<'a, T: Serialize> {
    expression: String,
    #[serde(flatten)]
    result: &'a T,
}

fn expression_text(tokens: &[Token]) -> String {
    tokens
        .iter()
        .map(|t| t.value.as_str())
        .filter(|v| !v.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

fn tokens_to_latex(tokens: &[Token]) -> String {
    let rows = tokens
        .iter()
        .map(|t| {
            format!(
                "{} & {} & {} & {}",
                t.kind,
                crowbook_text_processing::escape::tex(t.value.as_str()),
                t.position.line,
                t.position.column
            )
        })
        .collect::<Vec<_>>()
        .join("\\\\\n");
    "\\begin{tabular}{l|l|r|r}\nToken & Value & Line & Column\\\\\\hline\n".to_string()
        + &rows
        + "\\\\\n\\end{tabular}"
}

fn read_source(path: Option<&str>) -> std::io::Result<String> {
    match path {
        Some(path) => fs::read_to_string(path),
        None => {
            let mut source = String::new();
            std::io::stdin().lock().read_to_string(&mut source)?;
            Ok(source)
        }
    }
}

fn main() {
    let mut log = PrintLog::new();
    if let Err(e) = run(&mut log) {
        log.add_error(e.to_string());
        process::exit(1);
    }
}

fn run(log: &mut PrintLog) -> Result<(), Box<dyn std::error::Error>> {
    let mut actions: Vec<&str> = Vec::new();
    let mut outputs: Vec<&str> = Vec::new();
    let args = std::env::args().skip(1).collect::<Vec<String>>();
    let mut i: usize = 0;
    while i < args.len() && args[i] == "elf" {
        actions.push(args[i].as_str());
        i += 1;
    }
    while i < args.len() && OUTPUTS.contains(&args[i].as_str()) {
        outputs.push(args[i].as_str());
        i += 1;
    }

    let mut output_format = OutputFormat::Plain;
    let mut source_path: Option<&str> = None;
    let mut terminals: Option<Vec<&str>> = None;

    while i < args.len() && ["-h", "--help", "-l", "-j", "-s", "-t"].contains(&args[i].as_str()) {
        match args[i].as_str() {
            "-h" | "--help" => {
                print_help();
                return Ok(());
            }
            "-l" => output_format = OutputFormat::LaTeX,
            "-j" => output_format = OutputFormat::JSON,
            option => {
                i += 1;
                let Some(value) = args.get(i) else {
                    return Err(format!("missing value after {}", option).into());
                };
                if option == "-s" {
                    source_path = Some(value.as_str());
                } else {
                    terminals = Some(
                        value
                            .split(',')
                            .map(|t| t.trim())
                            .filter(|t| !t.is_empty())
                            .collect(),
                    );
                }
            }
        }
        i += 1;
    }

    if i + 1 < args.len() || outputs.is_empty() {
        print_help();
        return Ok(());
    }

    let grammar = match args.get(i) {
        Some(path) => Grammar::parse(&fs::read_to_string(path)?)?,
        None => Grammar::arithmetic(),
    };

    let analysis = match terminals {
        Some(terminals) => Analysis::strict(grammar, terminals)?,
        None => Analysis::new(grammar),
    };

    let source = if outputs
        .iter()
        .any(|o| ["tokens", "validate", "predict"].contains(o))
    {
        read_source(source_path)?
    } else {
        String::new()
    };

    let eliminated = actions.contains(&"elf");

    for output in outputs {
        if output == "prod" {
            let g = if eliminated {
                analysis.grammar()
            } else {
                analysis.original()
            };
            let t = g.to_production_output_vec();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t)?,
                }
            );
        }
        if output == "ff" {
            let t = analysis.first().to_non_terminal_output_vec(analysis.follow());
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => t.to_json()?,
                }
            );
        }
        if output == "ll1" {
            let t = analysis.table();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t.to_output())?,
                }
            );
        }
        if output == "afd" {
            let t = analysis.afd();
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t.to_plaintext(),
                    OutputFormat::LaTeX => t.to_latex(),
                    OutputFormat::JSON => serde_json::to_string(&t.to_output())?,
                }
            );
        }
        if output == "tokens" {
            let t = tokenize(&source);
            println!(
                "{}",
                match output_format {
                    OutputFormat::Plain => t
                        .iter()
                        .map(|token| token.to_string())
                        .collect::<Vec<_>>()
                        .join("\n"),
                    OutputFormat::LaTeX => tokens_to_latex(&t),
                    OutputFormat::JSON => serde_json::to_string(&t)?,
                }
            );
        }
        if output == "validate" {
            let results = analysis.validate_expressions(&source);
            match output_format {
                OutputFormat::JSON => {
                    let t = results
                        .iter()
                        .map(|(expression, validation)| ExpressionOutput {
                            expression: expression_text(expression),
                            result: validation,
                        })
                        .collect::<Vec<_>>();
                    println!("{}", serde_json::to_string(&t)?);
                }
                _ => {
                    for (expression, validation) in &results {
                        println!("{}", expression_text(expression));
                        println!("{}\n", validation.to_plaintext(analysis.afd()));
                    }
                }
            }
        }
        if output == "predict" {
            let mut results = Vec::new();
            for mut expression in extract_expressions(&tokenize(&source)) {
                if let Some(position) = expression.last().map(|t| t.position) {
                    expression.push(Token::end(position));
                }
                let recognition = analysis.predict(&expression);
                results.push((expression, recognition));
            }
            match output_format {
                OutputFormat::JSON => {
                    let t = results
                        .iter()
                        .map(|(expression, recognition)| ExpressionOutput {
                            expression: expression_text(expression),
                            result: recognition,
                        })
                        .collect::<Vec<_>>();
                    println!("{}", serde_json::to_string(&t)?);
                }
                _ => {
                    for (expression, recognition) in &results {
                        println!("{}", expression_text(expression));
                        println!("{}\n", recognition.to_plaintext());
                    }
                }
            }
        }
    }

    log.replay(analysis.log());
    Ok(())
}
