use std::env;
use std::process::ExitCode;

use nalgebra::{
    DMatrix,
    DVector
};
use tracing::error;
use tracing_subscriber::EnvFilter;

use colormapper::color::controlpoint::Rgb;
use colormapper::colormapper::ColorMapper;
use colormapper::configuration::Configuration;
use colormapper::manager::manager::IManager;
use colormapper::transform::inputtransformer::{
    DataType,
    InputData
};

const SAMPLE_CONTROL_POINTS: [Rgb; 5] = [
    Rgb::new(243, 30, 104),
    Rgb::new(252, 39, 47),
    Rgb::new(249, 171, 60),
    Rgb::new(255, 229, 119),
    Rgb::new(255, 255, 255),
];

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = Configuration::new();
    let mut mapper = ColorMapper::new();

    match env::args().nth(1) {
        Some(config_path) => {
            config.from_reader(&config_path)?;
            let names = config.palette_manager().names();
            let name = names.first().ok_or("configuration contains no palettes")?;
            println!("palette: {}", name);
            mapper = ColorMapper::from_curve(config.palette_manager().get(name)?);
        },
        None => mapper.generate_map(&SAMPLE_CONTROL_POINTS)?
    }

    let curve = mapper.curve().ok_or("no curve generated")?;
    for i in 0..=10 {
        let parameter = i as f64 / 10.0;
        let rgb = curve.evaluate(parameter)?;
        println!("{:.1}: ({}, {}, {})", parameter, rgb.r, rgb.g, rgb.b);
    }

    let settings = config.mapping_settings();
    let grid = DMatrix::from_fn(3, 4, |i, j| (i * 4 + j) as f64 - 5.0);
    let data = match settings.data_type {
        DataType::Scalar => InputData::Scalar(grid),
        DataType::Vector => InputData::Vector(grid.map(|x| DVector::from_vec(vec![x, 1.0])))
    };
    let output = mapper.map(&data, settings.output_space, settings.raw_output)?;
    println!("{} grid:", settings.output_space);
    for row in output.row_iter() {
        let cells: Vec<String> = row
            .iter()
            .map(|c| format!("({:.2}, {:.2}, {:.2})", c[0], c[1], c[2]))
            .collect();
        println!("  {}", cells.join(" "));
    }
    Ok(())
}

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}", err);
            ExitCode::FAILURE
        }
    }
}
