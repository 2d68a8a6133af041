/*
 * Test Suite for the Tick Timer
 *
 * Module-level unit tests live next to the code they cover. This module
 * holds the shared mock collaborators and the scenarios that exercise the
 * timer end to end.
 *
 * - `mock`: interrupt flag, schedulers, dispatch layer and timer chip mocks
 * - `sleep_scenarios`: hand-driven ticks with a recording scheduler
 * - `threaded`: real blocking sleeps and calibration with a ticker thread
 * - `global`: `timer::init` and the free-function API
 */
