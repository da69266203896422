fn main() -> Result<(), eframe::Error> {
    // Set up logging for development
    env_logger::init();

    // Run the tile canvas application
    tile_canvas::run_app()
}
