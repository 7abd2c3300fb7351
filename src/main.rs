use std::{env, fs::read_to_string, process::exit, rc::Rc, time::Instant};

use lynx_syntax::{
    display_error,
    expand::{builtins, expander::MacroRegistry},
    lexer::lexer::tokenize,
    parser::{operators::OperatorTable, parser::parse},
};

fn main() {
    let args: Vec<String> = env::args().collect();

    if args.len() != 2 {
        eprintln!("Usage: lynx-syntax <file>");
        exit(2);
    }

    let file_path: &str = &args[1];
    let file_name = if file_path.contains('/') {
        file_path.split('/').last().unwrap()
    } else {
        file_path
    };

    let source = read_to_string(file_path).expect("Failed to read file!");

    let start = Instant::now();

    let tokens = match tokenize(source.clone(), Some(String::from(file_name))) {
        Ok(tokens) => tokens,
        Err(error) => {
            display_error(&error, &source);
            exit(1);
        }
    };

    println!("Tokenized in {:?}", start.elapsed());

    let parse_start = Instant::now();

    let mut macros = MacroRegistry::new();
    builtins::install(&mut macros);

    let (parser, result) = parse(
        tokens,
        Rc::new(String::from(file_name)),
        OperatorTable::standard(),
        macros,
    );

    println!("Parsed in {:?}", parse_start.elapsed());
    println!("Total time: {:?}", start.elapsed());

    match result {
        Ok(ast) => {
            println!("{}", pretty_print(format!("{}", ast)));
            println!(
                "{} operators declared after parsing",
                parser.operators().len()
            );
        }
        Err(diagnostics) => {
            for error in &diagnostics {
                display_error(error, &source);
            }
            exit(1);
        }
    }
}

fn pretty_print(string: String) -> String {
    let mut result = String::new();
    let mut indent = 0;
    let mut ignore_next_space = false;

    for c in string.chars() {
        match c {
            '{' => {
                indent += 1;
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = true;
            }
            '(' | '[' => {
                indent += 1;
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
            }
            '}' | ')' | ']' => {
                indent -= 1;
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                result.push(c);
            }
            ',' | ';' => {
                result.push(c);
                result.push('\n');
                result.push_str(&"  ".repeat(indent));
                ignore_next_space = true;
            }
            ' ' if ignore_next_space => {
                ignore_next_space = false;
            }
            _ => result.push(c),
        }
    }

    result
}
