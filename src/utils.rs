pub fn progress_bar(length: u64, message: String) -> indicatif::ProgressBar {
    // Progress bar
    let progress_style = indicatif::ProgressStyle::with_template(
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta}) {msg}",
    )
    .unwrap()
    .progress_chars("##-");

    let progress_bar = indicatif::ProgressBar::new(length);
    progress_bar.set_style(progress_style);
    progress_bar.set_message(message);
    progress_bar
}
