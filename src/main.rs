use forkindex::ui::output;

fn main() {
    if let Err(err) = forkindex::cli::run() {
        output::error(format!("{:#}", err));
        std::process::exit(1);
    }
}
