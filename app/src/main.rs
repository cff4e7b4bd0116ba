#![no_main]
#![no_std]

use core::cell::Cell;
use cortex_m;
use cortex_m::interrupt::Mutex;
use cortex_m_rt::{entry, exception};
use log::{error, info, LevelFilter};
use panic_halt as _;

use stm32f0xx_hal as hal;

use debounce::controller::Controller;
use debounce::ticker::Ticker;
use debounce::{CompanionConfig, ConfigError, Instant, Mode, DEFAULT_CONFIG};

use crate::board::Board;
use crate::hal::pac;
use crate::hal::pac::interrupt;
use crate::hal::prelude::*;

mod board;
mod buzzer;
mod logger;
mod serial;

static CONFIG: CompanionConfig = CompanionConfig {
    mode: Mode::Sensors,
    ..DEFAULT_CONFIG
};

/// Milliseconds since boot, advanced by SysTick. 64 bits so it never wraps;
/// Cortex-M0 has no 64-bit atomics, so it is read in a critical section.
static TIME: Mutex<Cell<u64>> = Mutex::new(Cell::new(0));

fn now() -> Instant {
    Instant::from_ticks(cortex_m::interrupt::free(|cs| TIME.borrow(cs).get()))
}

fn setup(start: Instant) -> Result<(Controller, Ticker), ConfigError> {
    let controller = Controller::new(&CONFIG)?;
    let ticker = Ticker::new(CONFIG.tick_period, start)?;
    Ok((controller, ticker))
}

fn halt() -> ! {
    loop {
        cortex_m::asm::wfi();
    }
}

#[entry]
fn main() -> ! {
    let dp = pac::Peripherals::take().unwrap();
    let cp = cortex_m::Peripherals::take().unwrap();

    let mut flash = dp.FLASH;
    let mut rcc = dp.RCC.configure().sysclk(48.mhz()).freeze(&mut flash);
    let gpioa = dp.GPIOA.split(&mut rcc);
    let gpiob = dp.GPIOB.split(&mut rcc);

    let (ir, touch, flashlight, buzzer, tx_pin, rx_pin) = cortex_m::interrupt::free(|cs| {
        (
            gpioa.pa0.into_pull_up_input(cs),
            gpioa.pa1.into_pull_down_input(cs),
            gpioa.pa4.into_push_pull_output(cs),
            gpioa.pa5.into_push_pull_output(cs),
            gpiob.pb6.into_alternate_af0(cs),
            gpiob.pb7.into_alternate_af0(cs),
        )
    });

    let uart = hal::serial::Serial::usart1(dp.USART1, (tx_pin, rx_pin), 115_200.bps(), &mut rcc);
    serial::uart1::init(uart, 2);
    logger::init(LevelFilter::Info);

    let mut syst = hal::timers::Timer::syst(cp.SYST, 1000.hz(), &mut rcc);
    syst.listen(&hal::timers::Event::TimeOut);

    info!("companion starting");

    let (mut controller, mut ticker) = match setup(now()) {
        Ok(parts) => parts,
        Err(e) => {
            error!("invalid configuration: {}", e);
            halt()
        }
    };

    let mut board = Board::new(ir, touch, flashlight, buzzer, now());
    controller.start(&mut board);
    board.beep();

    loop {
        let time = now();
        board.service(time);

        if board.shutdown_requested() {
            controller.shutdown(&mut board);
            break;
        }

        if ticker.poll(time) {
            controller.tick(time, &mut board);
        }

        // SysTick or a received byte wakes us up again.
        cortex_m::asm::wfi();
    }

    info!("stopped");
    halt()
}

#[exception]
fn SysTick() {
    cortex_m::interrupt::free(|cs| {
        let time = TIME.borrow(cs);
        time.set(time.get() + 1);
    });
}
