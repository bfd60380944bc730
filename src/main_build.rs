// Copyright (C) 2020-2024 Andy Kurnia.

use dawgplay::{alphabet, build, dawg, error};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

fn build_dawg(alphabet: &alphabet::Alphabet, giant_string: &str) -> error::Returns<Vec<u8>> {
    let machine_words =
        build::read_machine_words(&alphabet::AlphabetReader::new(alphabet), giant_string)?;
    Ok(build::build(&machine_words)?.to_bytes())
}

// one word per line, in machine order.
fn export_words(alphabet: &alphabet::Alphabet, dawg_file: &str) -> error::Returns<String> {
    let dawg = dawg::Dawg::from_bytes_alloc(&std::fs::read(dawg_file)?)?;
    dawg.check_alphabet(alphabet.len())?;
    let mut ret = String::new();
    dawg.for_each_word(|word| {
        for &tile in word {
            ret.push_str(alphabet.of(tile).unwrap_or("?"));
        }
        ret.push('\n');
    });
    Ok(ret)
}

fn print_usage(exe: &str) {
    println!(
        "args:
  {exe} polish-dawg words.txt out.dawg
    build a word graph from a polish word list
  {exe} english-dawg words.txt out.dawg
    build a word graph from an english word list
  {exe} csv-dawg alphabet.csv words.txt out.dawg
    build with a custom alphabet (label,lowercase,freq,score)
  {exe} polish-words in.dawg out.txt
  {exe} english-words in.dawg out.txt
  {exe} csv-words alphabet.csv in.dawg out.txt
    list every word accepted by a word graph
  {exe} stats in.dawg
    print the number of nodes, edges and words"
    );
}

fn main() -> error::Returns<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = std::env::args().collect::<Vec<_>>();
    let exe = args.first().map_or("buildlex", |s| s.as_str());
    let t0 = std::time::Instant::now();
    match args.iter().skip(1).map(|s| s.as_str()).collect::<Vec<_>>()[..] {
        ["polish-dawg", words, out] => {
            std::fs::write(
                out,
                build_dawg(
                    &alphabet::make_polish_alphabet(),
                    &std::fs::read_to_string(words)?,
                )?,
            )?;
        }
        ["english-dawg", words, out] => {
            std::fs::write(
                out,
                build_dawg(
                    &alphabet::make_english_alphabet(),
                    &std::fs::read_to_string(words)?,
                )?,
            )?;
        }
        ["csv-dawg", csv, words, out] => {
            std::fs::write(
                out,
                build_dawg(
                    &alphabet::Alphabet::from_csv_reader(std::fs::File::open(csv)?)?,
                    &std::fs::read_to_string(words)?,
                )?,
            )?;
        }
        ["polish-words", dawg_file, out] => {
            std::fs::write(
                out,
                export_words(&alphabet::make_polish_alphabet(), dawg_file)?,
            )?;
        }
        ["english-words", dawg_file, out] => {
            std::fs::write(
                out,
                export_words(&alphabet::make_english_alphabet(), dawg_file)?,
            )?;
        }
        ["csv-words", csv, dawg_file, out] => {
            std::fs::write(
                out,
                export_words(
                    &alphabet::Alphabet::from_csv_reader(std::fs::File::open(csv)?)?,
                    dawg_file,
                )?,
            )?;
        }
        ["stats", dawg_file] => {
            let dawg = dawg::Dawg::from_bytes_alloc(&std::fs::read(dawg_file)?)?;
            println!(
                "{} nodes, {} edges, {} words",
                dawg.num_nodes(),
                dawg.num_edges(),
                dawg.count_words()
            );
        }
        _ => {
            print_usage(exe);
            return Ok(());
        }
    }
    tracing::info!(elapsed = ?t0.elapsed(), "done");
    Ok(())
}
