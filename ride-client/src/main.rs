use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, bail};
use chrono::{DateTime, Utc};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::{Map, Value};
use tracing_subscriber::EnvFilter;

use ride_client::api::{
    EmergencyService, EmergencyType, NewBooking, NewTrip, RideClient, Trip, VehicleType, Vendor,
    VendorFilter, VendorSource, VendorType,
};
use ride_client::cache::CachedRideClient;
use ride_client::config::Settings;
use ride_client::draft::{LocalStore, STOPS_FIELD, TripStorage};
use ride_client::format::{
    calculate_distance, emergency_icon, format_currency, format_distance, render_stars,
    vendor_icon,
};
use ride_client::mock::MockBackend;
use ride_client::notify::{Toast, ToastCenter};
use ride_client::{fuel, report};

/// born2ride - plan motorcycle and car road trips
#[derive(Debug, Parser)]
#[command(name = "born2ride", version, about, long_about = None)]
struct Cli {
    /// Backend host (overrides B2R_HOST)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Full backend base URL, e.g. http://localhost:8000/api (overrides B2R_API_URL)
    #[arg(long, global = true, value_name = "URL")]
    api_url: Option<String>,

    /// File holding the local trip draft (overrides B2R_STORE_PATH)
    #[arg(long, global = true, value_name = "FILE")]
    store: Option<PathBuf>,

    /// Print raw JSON instead of formatted text
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Show the backend's endpoint list
    Overview,

    /// Saved trips
    #[command(subcommand)]
    Trips(TripsCommand),

    /// Estimate fuel for a distance
    Fuel(FuelArgs),

    /// Food stops, hotels and workshops
    Vendors(VendorsArgs),

    /// Police, hospitals, ambulances, fire and roadside help
    Emergency {
        /// Only this kind of service
        #[arg(long = "type", value_name = "TYPE")]
        service_type: Option<EmergencyType>,
    },

    /// Hotel and workshop bookings
    #[command(subcommand)]
    Bookings(BookingsCommand),

    /// The trip being planned, kept locally
    #[command(subcommand)]
    Draft(DraftCommand),

    /// Straight-line distance between two coordinates
    #[command(allow_negative_numbers = true)]
    Distance {
        lat1: f64,
        lon1: f64,
        lat2: f64,
        lon2: f64,
    },

    /// Run an in-memory backend for working offline
    MockServer {
        #[arg(long, default_value_t = 8000)]
        port: u16,

        #[arg(long, default_value_t = IpAddr::V4(Ipv4Addr::LOCALHOST))]
        bind: IpAddr,
    },
}

#[derive(Debug, Subcommand)]
enum TripsCommand {
    /// List trips, newest first
    List,

    /// Show one trip
    Show { id: u64 },

    /// Save a new trip
    Create(CreateTripArgs),
}

#[derive(Debug, Args)]
struct CreateTripArgs {
    origin: String,
    destination: String,

    /// Distance in km; computed from the coordinates when omitted
    #[arg(long)]
    distance: Option<f64>,

    #[arg(long, default_value = "bike")]
    vehicle: VehicleType,

    /// Origin as LAT LNG
    #[arg(long, num_args = 2, value_names = ["LAT", "LNG"], allow_negative_numbers = true)]
    from: Option<Vec<f64>>,

    /// Destination as LAT LNG
    #[arg(long, num_args = 2, value_names = ["LAT", "LNG"], allow_negative_numbers = true)]
    to: Option<Vec<f64>>,

    /// Attach the stops from the local draft and clear it once saved
    #[arg(long)]
    with_draft: bool,
}

#[derive(Debug, Args)]
struct FuelArgs {
    distance: f64,

    #[arg(long, default_value = "bike")]
    vehicle: VehicleType,

    /// Price per litre in INR
    #[arg(long)]
    price: Option<f64>,

    /// Compute locally instead of asking the backend
    #[arg(long)]
    offline: bool,
}

#[derive(Debug, Args)]
struct VendorsArgs {
    #[arg(long = "type", value_name = "TYPE")]
    vendor_type: Option<VendorType>,

    /// Only vendors that are open
    #[arg(long)]
    open: bool,

    /// Only vendors listed through this source
    #[arg(long)]
    source: Option<VendorSource>,
}

#[derive(Debug, Subcommand)]
enum BookingsCommand {
    /// List bookings
    List,

    /// Book a hotel or workshop
    Create {
        #[arg(long)]
        vendor: u64,

        #[arg(long)]
        name: String,

        #[arg(long)]
        phone: String,

        /// Total price in INR
        #[arg(long)]
        total: f64,

        /// RFC 3339 timestamp, e.g. 2024-05-01T12:00:00Z
        #[arg(long)]
        check_in: Option<DateTime<Utc>>,

        #[arg(long)]
        check_out: Option<DateTime<Utc>>,
    },
}

#[derive(Debug, Subcommand)]
enum DraftCommand {
    /// Print the draft
    Show,

    /// Delete the draft
    Clear,

    /// Set top-level fields, e.g. `distance=346.1 origin=Chennai`
    Set {
        #[arg(required = true, value_parser = parse_field)]
        fields: Vec<(String, Value)>,
    },

    /// Append a stop (JSON or plain text)
    AddStop {
        #[arg(value_parser = parse_json_or_text)]
        stop: Value,
    },
}

/// Parse `key=value`, reading the value as JSON when it is valid JSON.
fn parse_field(s: &str) -> Result<(String, Value), String> {
    let (key, value) = s
        .split_once('=')
        .ok_or_else(|| format!("expected key=value, got {s:?}"))?;
    if key.is_empty() {
        return Err(format!("missing key in {s:?}"));
    }
    Ok((key.to_string(), parse_json_or_text(value)?))
}

fn parse_json_or_text(s: &str) -> Result<Value, String> {
    Ok(serde_json::from_str(s).unwrap_or_else(|_| Value::String(s.to_string())))
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            let mut toasts = ToastCenter::new();
            let toast = report::report(&mut toasts, &*err);
            eprintln!("{toast}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let env = Settings::from_env().context("reading settings from the environment")?;
    let settings = apply_flags(&cli, env);
    let json = cli.json;

    match cli.command {
        Command::Overview => {
            let overview = client(&settings)?.overview().await?;
            if json {
                return print_json(&overview);
            }
            println!("{} (v{})", overview.message, overview.version);
            for (name, path) in &overview.endpoints {
                println!("  {name:<12} {path}");
            }
        }

        Command::Trips(command) => trips(&settings, command, json).await?,

        Command::Fuel(args) => {
            let estimate = if args.offline {
                fuel::estimate(args.distance, args.vehicle, args.price)
            } else {
                client(&settings)?
                    .calculate_fuel(args.distance, args.vehicle, args.price)
                    .await?
            };
            if json {
                return print_json(&estimate);
            }
            println!(
                "{} by {} at {} km/l: {:.2} l at {}/l = {}",
                format_distance(estimate.distance_km),
                estimate.vehicle_type,
                estimate.mileage_kmpl,
                estimate.fuel_liters,
                format_currency(estimate.fuel_price_per_liter),
                format_currency(estimate.total_fuel_cost),
            );
        }

        Command::Vendors(args) => {
            let client = client(&settings)?;
            let vendors = if args.open || args.source.is_some() {
                let filter = VendorFilter {
                    vendor_type: args.vendor_type,
                    is_open: args.open.then_some(true),
                    source: args.source,
                };
                client.search_vendors(&filter).await?
            } else {
                let cached = CachedRideClient::new(client, &settings.cache);
                cached.vendors(args.vendor_type).await?.to_vec()
            };
            if json {
                return print_json(&vendors);
            }
            vendors.iter().for_each(print_vendor);
        }

        Command::Emergency { service_type } => {
            let cached = CachedRideClient::new(client(&settings)?, &settings.cache);
            let services = cached.emergency_services(service_type).await?;
            if json {
                return print_json(&*services);
            }
            services.iter().for_each(print_service);
        }

        Command::Bookings(command) => {
            let client = client(&settings)?;
            match command {
                BookingsCommand::List => {
                    let bookings = client.bookings().await?;
                    if json {
                        return print_json(&bookings);
                    }
                    for b in &bookings {
                        println!(
                            "#{} {} for {} ({}) {} [{:?}]",
                            b.id,
                            b.vendor_name,
                            b.customer_name,
                            b.phone,
                            format_currency(b.total_price),
                            b.status,
                        );
                    }
                }
                BookingsCommand::Create {
                    vendor,
                    name,
                    phone,
                    total,
                    check_in,
                    check_out,
                } => {
                    let booking = client
                        .create_booking(&NewBooking {
                            vendor,
                            customer_name: name,
                            phone,
                            check_in,
                            check_out,
                            total_price: total,
                        })
                        .await?;
                    if json {
                        return print_json(&booking);
                    }
                    println!(
                        "{}",
                        Toast::success(format!(
                            "Booking #{} confirmed at {}",
                            booking.id, booking.vendor_name
                        ))
                    );
                }
            }
        }

        Command::Draft(command) => draft(&settings, command, json)?,

        Command::Distance {
            lat1,
            lon1,
            lat2,
            lon2,
        } => {
            println!(
                "{}",
                format_distance(calculate_distance(lat1, lon1, lat2, lon2))
            );
        }

        Command::MockServer { port, bind } => {
            let addr = SocketAddr::new(bind, port);
            println!("Mock backend on http://{addr}/api");
            MockBackend::seeded().serve(addr).await?;
        }
    }

    Ok(())
}

async fn trips(settings: &Settings, command: TripsCommand, json: bool) -> anyhow::Result<()> {
    let client = client(settings)?;

    match command {
        TripsCommand::List => {
            let trips = client.trips().await?;
            if json {
                return print_json(&trips);
            }
            if trips.is_empty() {
                println!("No trips saved yet");
            }
            trips.iter().for_each(print_trip);
        }
        TripsCommand::Show { id } => {
            let trip = client.trip(id).await?;
            if json {
                return print_json(&trip);
            }
            print_trip(&trip);
            for stop in &trip.stops_visited {
                println!("    stop: {}", Value::Object(stop.clone()));
            }
        }
        TripsCommand::Create(args) => {
            let distance = match (args.distance, &args.from, &args.to) {
                (Some(km), _, _) => km,
                (None, Some(from), Some(to)) => calculate_distance(from[0], from[1], to[0], to[1]),
                _ => bail!("give --distance, or both --from and --to"),
            };

            let mut trip = NewTrip::new(args.origin, args.destination, distance, args.vehicle);
            if let Some(from) = &args.from {
                trip = trip.with_origin_coords(from[0], from[1]);
            }
            if let Some(to) = &args.to {
                trip = trip.with_dest_coords(to[0], to[1]);
            }

            let storage = trip_storage(settings);
            if args.with_draft {
                trip = trip.with_stops(draft_stops(&storage)?);
            }

            let saved = client.create_trip(&trip).await?;
            if args.with_draft {
                storage.clear()?;
            }
            if json {
                return print_json(&saved);
            }
            println!("{}", Toast::success(format!("Trip #{} saved", saved.id)));
            print_trip(&saved);
        }
    }

    Ok(())
}

fn draft(settings: &Settings, command: DraftCommand, json: bool) -> anyhow::Result<()> {
    let storage = trip_storage(settings);

    match command {
        DraftCommand::Show => match storage.get()? {
            Some(draft) if json => print_json(&draft)?,
            Some(draft) => println!("{}", serde_json::to_string_pretty(&draft)?),
            None if json => println!("null"),
            None => println!("No trip draft saved"),
        },
        DraftCommand::Clear => {
            storage.clear()?;
            println!("{}", Toast::success("Trip draft cleared"));
        }
        DraftCommand::Set { fields } => {
            let updates: Map<String, Value> = fields.into_iter().collect();
            let draft = storage.update(updates)?;
            if json {
                print_json(&draft)?;
            } else {
                println!("{}", Toast::success("Trip draft updated"));
            }
        }
        DraftCommand::AddStop { stop } => {
            storage.add_stop(stop)?;
            println!("{}", Toast::success("Stop added"));
        }
    }

    Ok(())
}

/// Stops in the draft that are JSON objects.
fn draft_stops(storage: &TripStorage) -> anyhow::Result<Vec<Map<String, Value>>> {
    let draft = storage.get()?.unwrap_or_default();
    let stops = match draft.get(STOPS_FIELD) {
        Some(Value::Array(stops)) => stops
            .iter()
            .filter_map(|stop| stop.as_object().cloned())
            .collect(),
        _ => Vec::new(),
    };
    Ok(stops)
}

/// Let command-line flags override `settings`.
fn apply_flags(cli: &Cli, mut settings: Settings) -> Settings {
    if let Some(host) = &cli.host {
        let timeout = settings.api.timeout_secs;
        settings.api = ride_client::api::ApiConfig::for_host(host).with_timeout(timeout);
    }
    if let Some(url) = &cli.api_url {
        settings.api = settings.api.with_base_url(url.clone());
    }
    if let Some(path) = &cli.store {
        settings.store = ride_client::draft::StoreConfig::new(path.clone());
    }

    settings
}

fn client(settings: &Settings) -> anyhow::Result<RideClient> {
    Ok(RideClient::new(settings.api.clone())?)
}

fn trip_storage(settings: &Settings) -> TripStorage {
    TripStorage::new(LocalStore::new(settings.store.clone()))
}

fn print_json<T: Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_trip(trip: &Trip) {
    println!(
        "#{} {} -> {} | {} by {} | {} ({:.2} l) | {}",
        trip.id,
        trip.origin,
        trip.destination,
        format_distance(trip.distance_km),
        trip.vehicle_type,
        format_currency(trip.fuel_cost),
        trip.fuel_liters,
        trip.created_at.format("%Y-%m-%d %H:%M"),
    );
}

fn print_vendor(vendor: &Vendor) {
    let mut line = format!(
        "{} {} {} {:.1} | {} | {}",
        vendor_icon(vendor.vendor_type.as_str()),
        vendor.name,
        render_stars(vendor.rating),
        vendor.rating,
        vendor.phone,
        vendor.address,
    );
    if vendor.vendor_type == VendorType::Hotel {
        line.push_str(&format!(
            " | {} rooms from {}",
            vendor.rooms_available,
            format_currency(vendor.base_price)
        ));
    }
    if !vendor.is_open {
        line.push_str(" | closed");
    }
    println!("{line}");
}

fn print_service(service: &EmergencyService) {
    println!(
        "{} {} {} | {} | {}{}",
        emergency_icon(service.service_type.as_str()),
        service.service_type.label(),
        service.name,
        service.phone,
        service.address,
        if service.is_24x7 { " | 24x7" } else { "" },
    );
}
