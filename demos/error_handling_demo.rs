// demos/error_handling_demo.rs
use gld_engine::report::NullReporter;
use gld_engine::{audit, simulate, SimError, SimulationConfig, Trajectory};

fn main() {
    println!("Error Handling Demo for gld-engine");
    println!("==================================\n");

    // Test 1: Zero steps
    println!("1. Testing zero step count...");

    match simulate(&SimulationConfig::default().with_steps(0), &mut NullReporter) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 2: Negative time step
    println!("\n2. Testing negative time step...");

    let bad_dt = SimulationConfig {
        time_step: -0.05,
        ..Default::default()
    };

    match simulate(&bad_dt, &mut NullReporter) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 3: NaN noise amplitude
    println!("\n3. Testing non-finite noise amplitude...");

    let bad_noise = SimulationConfig {
        noise_amplitude: f64::NAN,
        ..Default::default()
    };

    match simulate(&bad_noise, &mut NullReporter) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 4: Audit on a single point
    println!("\n4. Testing audit on a one-point trajectory...");

    match audit(&Trajectory::from(vec![100.0])) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(e) => println!("   ✓ Caught error: {}", e),
    }

    // Test 5: Audit on a path through zero
    println!("\n5. Testing audit on a path that touches zero...");

    match audit(&Trajectory::from(vec![100.0, 0.0, 50.0])) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SimError::DivisionDegenerate { index, value }) => {
            println!("   ✓ Caught DivisionDegenerate at index {} (value {})", index, value);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 6: Finite constants that overflow the price
    println!("\n6. Testing a run whose price overflows...");

    let diverging = SimulationConfig {
        time_step: 1e308,
        target_baseline: 1e6,
        ..Default::default()
    };

    match simulate(&diverging, &mut NullReporter) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SimError::NonFinitePrice { index, value }) => {
            println!("   ✓ Caught NonFinitePrice at index {} (value {})", index, value);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    // Test 7: Valid configuration should work
    println!("\n7. Testing valid configuration...");

    match simulate(&SimulationConfig::default(), &mut NullReporter) {
        Ok(outcome) => println!(
            "   ✓ Success: Final price = {:.2}, Volatility = {:.2}%, Max drawdown = {:.2}%",
            outcome.report.final_price,
            outcome.report.annualized_volatility * 100.0,
            outcome.report.max_drawdown * 100.0
        ),
        Err(e) => println!("   Unexpected error: {}", e),
    }

    // Test 8: Error type matching
    println!("\n8. Testing error type matching...");

    let bad_bound = SimulationConfig {
        momentum_bound: 0.0,
        ..Default::default()
    };

    match simulate(&bad_bound, &mut NullReporter) {
        Ok(_) => println!("   Unexpected: Should have failed!"),
        Err(SimError::InvalidConfig {
            parameter,
            value,
            constraint,
        }) => {
            println!("   ✓ Caught InvalidConfig: {} = {} ({})", parameter, value, constraint);
        }
        Err(other) => println!("   Unexpected error type: {}", other),
    }

    println!("\n✓ Error handling demo complete!");
}
