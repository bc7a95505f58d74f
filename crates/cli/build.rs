use clap::{Arg, ArgAction, Command};
use clap_complete::{Shell, generate_to};
use std::env;
use std::io::Error;

fn flag(name: &'static str, help: &'static str) -> Arg {
    Arg::new(name).long(name).help(help).action(ArgAction::SetTrue)
}

fn build_cli() -> Command {
    Command::new("folio")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Read web articles into clean HTML, Markdown or text")
        .arg(Arg::new("url").value_name("URL").help("Article URL (http or https)").required(true))
        .arg(
            Arg::new("output")
                .short('o')
                .long("output")
                .value_name("FILE")
                .help("Output file (default: stdout)"),
        )
        .arg(
            Arg::new("format")
                .short('f')
                .long("format")
                .value_name("FORMAT")
                .default_value("markdown")
                .value_parser(["markdown", "md", "html", "text", "txt", "json"])
                .help("Output format (markdown, html, text, json)"),
        )
        .arg(Arg::new("timeout").long("timeout").value_name("SECS").help("HTTP timeout in seconds"))
        .arg(Arg::new("user-agent").long("user-agent").value_name("UA").help("Custom User-Agent for HTTP requests"))
        .arg(flag("mobile", "Send the mobile User-Agent"))
        .arg(flag("multipage", "Follow \"next page\" links and merge them into one article"))
        .arg(
            Arg::new("page-limit")
                .long("page-limit")
                .value_name("NUM")
                .default_value("10")
                .help("Maximum number of pages merged by --multipage"),
        )
        .arg(flag("deep-links", "Keep in-page anchors as #fragment links"))
        .arg(flag("headers", "Emit a full HTML document instead of the body fragment"))
        .arg(flag("no-headline", "Do not prepend the article title as a heading"))
        .arg(flag(
            "prefer-header-encoding",
            "Decode with the HTTP header charset when it disagrees with the document",
        ))
        .arg(flag("placeholders", "Replace images with numbered <!--IMG_n--> markers"))
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .help("Enable debug logging")
                .action(ArgAction::SetTrue),
        )
}

fn main() -> Result<(), Error> {
    let outdir = match env::var_os("OUT_DIR") {
        None => return Ok(()),
        Some(outdir) => outdir,
    };

    let completions_dir = std::path::Path::new(&outdir).join("completions");
    std::fs::create_dir_all(&completions_dir)?;

    let mut cmd = build_cli();

    for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
        generate_to(shell, &mut cmd, "folio", &completions_dir)?;
    }

    println!("cargo:rerun-if-changed=build.rs");

    Ok(())
}
