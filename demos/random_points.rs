use lloyd::{ConvergencePolicy, IterationObserver, IterationSnapshot, Lloyd, NormalSource};

/// Console presenter: prints the convergence metric of every iteration, the
/// way a plotting frontend would redraw its figure.
struct ConsolePresenter;

impl IterationObserver for ConsolePresenter {
    fn on_iteration(&mut self, snapshot: &IterationSnapshot<'_>) {
        println!("iteration {:>3}  rss {:.6}", snapshot.iteration, snapshot.metric);
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Minimal end-to-end: random points -> engine -> per-iteration reporting.
    //
    // Plays the role of the CLI driver: fixed k and point count here instead
    // of parsed flags, seeded so two runs print the same convergence trace.
    let k = 3;
    let points = NormalSource::new(100).with_seed(7).sample()?;

    let engine = Lloyd::new(k)
        .with_seed(7)
        .with_convergence(ConvergencePolicy::Rss);

    let fit = engine.fit_observed(&points, &mut ConsolePresenter)?;

    println!(
        "converged={} iterations={}",
        fit.converged(),
        fit.iterations()
    );
    for (c, members) in fit.state().clusters().iter().enumerate() {
        let centroid = fit.state().centroids().row(c);
        println!(
            "  cluster {}: {} points, centroid ({:.3}, {:.3})",
            c,
            members.len(),
            centroid[0],
            centroid[1]
        );
    }

    Ok(())
}
