use std::process;

fn main() {
    env_logger::init();

    let options = match gravmap::cli::Options::from_env() {
        Ok(options) => options,
        Err(error) => {
            eprintln!("gravmap: {}", error);
            process::exit(2);
        }
    };

    if let Err(error) = gravmap::cli::main(options) {
        eprintln!("gravmap: {}", error);
        process::exit(1);
    }
}
