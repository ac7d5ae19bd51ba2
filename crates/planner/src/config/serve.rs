use clap::Args;

#[derive(Args, Debug, Clone)]
pub struct ServeArgs {
    #[arg(
        long,
        env = "PLANNER_LISTEN",
        default_value = "0.0.0.0:8080",
        help = "Address the HTTP API listens on"
    )]
    pub listen: String,
}
